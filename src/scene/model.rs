use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::animation::ease::{Easing, EasingDef};
use crate::animation::value::PropertyMap;
use crate::foundation::error::{NovaError, NovaResult};
use crate::foundation::ids::{AnimationId, ElementId, TemplateId};

/// Playout phase of a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    In,
    Loop,
    Out,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::In, Phase::Loop, Phase::Out];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Loop => "loop",
            Self::Out => "out",
        }
    }

    /// Easing used when an animation does not name one.
    pub fn default_easing(self) -> Easing {
        match self {
            Self::In => Easing::EaseOut,
            Self::Loop => Easing::Linear,
            Self::Out => Easing::EaseIn,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = NovaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Ok(Self::In),
            "loop" => Ok(Self::Loop),
            "out" => Ok(Self::Out),
            other => Err(NovaError::validation(format!(
                "unknown phase \"{other}\" (expected in, loop or out)"
            ))),
        }
    }
}

/// Phase -> duration in milliseconds. Missing keys take the defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseDurations {
    #[serde(rename = "in")]
    pub in_ms: f64,
    #[serde(rename = "loop")]
    pub loop_ms: f64,
    #[serde(rename = "out")]
    pub out_ms: f64,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            in_ms: 3000.0,
            loop_ms: 5000.0,
            out_ms: 3000.0,
        }
    }
}

impl PhaseDurations {
    pub fn get(&self, phase: Phase) -> f64 {
        match phase {
            Phase::In => self.in_ms,
            Phase::Loop => self.loop_ms,
            Phase::Out => self.out_ms,
        }
    }

    pub(crate) fn validate(&self, what: &str) -> NovaResult<()> {
        for phase in Phase::ALL {
            let ms = self.get(phase);
            if !ms.is_finite() || ms < 0.0 {
                return Err(NovaError::validation(format!(
                    "{what}: {phase} duration must be a finite, non-negative number of ms (got {ms})"
                )));
            }
        }
        Ok(())
    }
}

/// One animation per (element, phase).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub id: AnimationId,
    pub element_id: ElementId,
    pub phase: Phase,
    #[serde(default)]
    pub delay_ms: f64,
    /// `None` runs for the whole phase.
    #[serde(default)]
    pub duration_ms: Option<f64>,
    #[serde(default)]
    pub easing: Option<EasingDef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub animation_id: AnimationId,
    pub position: f64,
    #[serde(default)]
    pub properties: PropertyMap,
    /// Easing for the segment starting at this keyframe.
    #[serde(default)]
    pub easing: Option<EasingDef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    #[serde(default)]
    pub name: Option<String>,
    /// Static authored styles, shown when no animation overrides them.
    #[serde(default)]
    pub styles: PropertyMap,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub animations: Vec<Animation>,
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
    #[serde(default)]
    pub phase_durations: Option<PhaseDurations>,
}

/// Records handed over by the persistence layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub phase_durations: PhaseDurations,
    #[serde(default)]
    pub templates: Vec<Template>,
}

impl Project {
    pub fn from_json_str(s: &str) -> NovaResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| NovaError::validation(format!("parse project JSON: {e}")))
    }

    pub fn from_reader<R: std::io::Read>(r: R) -> NovaResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| NovaError::validation(format!("parse project JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> NovaResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            NovaError::validation(format!("open project JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn template(&self, id: &TemplateId) -> Option<&Template> {
        self.templates.iter().find(|t| &t.id == id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
