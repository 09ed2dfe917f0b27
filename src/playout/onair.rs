use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::foundation::ids::{LayerId, TemplateId};
use crate::scene::model::Phase;

/// What a layer is showing right now.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OnAirState {
    pub template_id: TemplateId,
    pub phase: Phase,
    /// Clock time the phase started. `None` until the driver stamps it on its next tick.
    pub phase_started_ms: Option<f64>,
    pub phase_duration_ms: f64,
    /// Template to bring in once the current `out` phase completes.
    pub pending_switch: Option<TemplateId>,
}

impl OnAirState {
    /// Milliseconds since the phase started, `0` while unstamped.
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        self.phase_started_ms.map_or(0.0, |start| (now_ms - start).max(0.0))
    }

    pub fn stamp(&self) -> PhaseStamp {
        PhaseStamp {
            template_id: self.template_id.clone(),
            phase: self.phase,
            started_ms: self.phase_started_ms,
        }
    }
}

/// Identity of one phase run on a layer. Conditional writes only land while the stored state
/// still carries the stamp they were computed from.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseStamp {
    pub template_id: TemplateId,
    pub phase: Phase,
    pub started_ms: Option<f64>,
}

impl PhaseStamp {
    fn holds(&self, state: &OnAirState) -> bool {
        state.template_id == self.template_id
            && state.phase == self.phase
            && state.phase_started_ms == self.started_ms
    }
}

/// Result of [`OnAirStore::complete_out`].
#[derive(Clone, Debug, PartialEq)]
pub enum OutCompletion {
    /// The pending template is now on air in `in`.
    Switched { next: TemplateId, duration_ms: f64 },
    /// Nothing was queued; the layer is idle.
    Cleared,
    /// The queued template has no phase duration (unknown to the caller); the layer was cleared.
    Rejected(TemplateId),
    /// The stored state no longer carries the expected stamp; nothing was written.
    Diverged,
}

/// Shared, authoritative on-air state per layer.
///
/// Cloning yields another handle to the same state, so command code (network triggers, the
/// playout UI) and the driver observe the same layers. Every mutation is one locked operation.
#[derive(Clone, Debug, Default)]
pub struct OnAirStore {
    inner: Arc<Mutex<BTreeMap<LayerId, OnAirState>>>,
}

impl OnAirStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<LayerId, OnAirState>> {
        // Every write is a single insert, remove or field store, so a poisoned map is still
        // consistent.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, layer: &LayerId) -> Option<OnAirState> {
        self.lock().get(layer).cloned()
    }

    pub fn is_on_air(&self, layer: &LayerId) -> bool {
        self.lock().contains_key(layer)
    }

    /// Put `template` on air in `phase`, replacing whatever the layer showed.
    pub fn begin(
        &self,
        layer: &LayerId,
        template: TemplateId,
        phase: Phase,
        started_ms: Option<f64>,
        duration_ms: f64,
    ) {
        self.lock().insert(
            layer.clone(),
            OnAirState {
                template_id: template,
                phase,
                phase_started_ms: started_ms,
                phase_duration_ms: duration_ms,
                pending_switch: None,
            },
        );
    }

    /// Move the layer to `phase`, keeping template and pending switch.
    /// Returns `false` when the layer is not on air.
    pub fn set_phase(
        &self,
        layer: &LayerId,
        phase: Phase,
        started_ms: Option<f64>,
        duration_ms: f64,
    ) -> bool {
        match self.lock().get_mut(layer) {
            Some(state) => {
                state.phase = phase;
                state.phase_started_ms = started_ms;
                state.phase_duration_ms = duration_ms;
                true
            }
            None => false,
        }
    }

    /// External "take out" signal: the driver picks it up on its next tick.
    /// Returns `false` when the layer is not on air.
    pub fn request_out(&self, layer: &LayerId) -> bool {
        match self.lock().get_mut(layer) {
            Some(state) => {
                if state.phase != Phase::Out {
                    state.phase = Phase::Out;
                    state.phase_started_ms = None;
                }
                true
            }
            None => false,
        }
    }

    /// Queue `next` to follow the current template. Returns `false` when the layer is idle.
    pub fn queue_switch(&self, layer: &LayerId, next: TemplateId) -> bool {
        match self.lock().get_mut(layer) {
            Some(state) => {
                state.pending_switch = Some(next);
                true
            }
            None => false,
        }
    }

    /// Move the layer to `phase` only while its state still carries `expected`.
    /// Returns `false`, writing nothing, when the layer was changed or cleared meanwhile.
    pub fn advance_phase(
        &self,
        layer: &LayerId,
        expected: &PhaseStamp,
        phase: Phase,
        started_ms: Option<f64>,
        duration_ms: f64,
    ) -> bool {
        match self.lock().get_mut(layer) {
            Some(state) if expected.holds(state) => {
                state.phase = phase;
                state.phase_started_ms = started_ms;
                state.phase_duration_ms = duration_ms;
                true
            }
            _ => false,
        }
    }

    /// Finish the layer's `out` under one lock: bring in the pending template, or clear the
    /// layer when nothing is queued. `in_duration` gives the incoming template's `in` duration.
    pub fn complete_out(
        &self,
        layer: &LayerId,
        expected: &PhaseStamp,
        started_ms: f64,
        in_duration: impl FnOnce(&TemplateId) -> Option<f64>,
    ) -> OutCompletion {
        let mut layers = self.lock();
        let Some(state) = layers.get_mut(layer) else {
            return OutCompletion::Diverged;
        };
        if !expected.holds(state) {
            return OutCompletion::Diverged;
        }
        let Some(next) = state.pending_switch.take() else {
            layers.remove(layer);
            return OutCompletion::Cleared;
        };
        let Some(duration_ms) = in_duration(&next) else {
            layers.remove(layer);
            return OutCompletion::Rejected(next);
        };
        *state = OnAirState {
            template_id: next.clone(),
            phase: Phase::In,
            phase_started_ms: Some(started_ms),
            phase_duration_ms: duration_ms,
            pending_switch: None,
        };
        OutCompletion::Switched { next, duration_ms }
    }

    pub fn clear(&self, layer: &LayerId) -> Option<OnAirState> {
        self.lock().remove(layer)
    }

    /// Copy of every layer's state, ordered by layer id.
    pub fn snapshot(&self) -> BTreeMap<LayerId, OnAirState> {
        self.lock().clone()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playout/onair.rs"]
mod tests;
