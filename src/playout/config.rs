use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{NovaError, NovaResult};
use crate::foundation::ids::LayerId;
use crate::scene::library::CompiledTemplate;
use crate::scene::model::{Phase, PhaseDurations};

/// Per-layer playout settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Overrides template and project phase durations on this layer.
    pub phase_durations: Option<PhaseDurations>,
}

/// Playout settings supplied by the controller.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayoutConfig {
    /// Replaces the project's default phase durations for this playout session.
    pub phase_durations: Option<PhaseDurations>,
    pub layers: BTreeMap<LayerId, LayerConfig>,
}

impl PlayoutConfig {
    pub fn from_json_str(s: &str) -> NovaResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| NovaError::validation(format!("parse playout config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> NovaResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            NovaError::validation(format!("open playout config '{}': {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| NovaError::validation(format!("parse playout config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> NovaResult<()> {
        if let Some(pd) = &self.phase_durations {
            pd.validate("playout config")?;
        }
        for (id, layer) in &self.layers {
            if let Some(pd) = &layer.phase_durations {
                pd.validate(&format!("layer '{id}'"))?;
            }
        }
        Ok(())
    }

    /// Duration of `phase` on `layer`.
    ///
    /// Precedence: layer override, template override, this config, then `project_default`.
    pub fn phase_duration(
        &self,
        layer: &LayerId,
        template: &CompiledTemplate,
        project_default: &PhaseDurations,
        phase: Phase,
    ) -> f64 {
        self.layers
            .get(layer)
            .and_then(|l| l.phase_durations.as_ref())
            .or(template.phase_durations())
            .or(self.phase_durations.as_ref())
            .unwrap_or(project_default)
            .get(phase)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playout/config.rs"]
mod tests;
