use crate::playout::PlayoutError;

/// Convenience result type used across novagfx.
pub type NovaResult<T> = Result<T, NovaError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum NovaError {
    /// Invalid project, template, or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while compiling or sampling animation tracks.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors while evaluating a template at a timeline position.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Playout command rejected by the driver.
    #[error("playout error: {0}")]
    Playout(#[from] PlayoutError),

    /// Errors when serializing or deserializing records.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NovaError {
    /// Build a [`NovaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`NovaError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`NovaError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`NovaError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for NovaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
