//! Template records as supplied by persistence, and their compiled runtime form.

/// Validated, indexed templates used by evaluation and playout.
pub mod library;
/// Serde boundary records (`Project`, `Template`, `Animation`, `Keyframe`, ...).
pub mod model;
