use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::eval::evaluator::{EvalQuery, Evaluator};
use crate::foundation::ids::{LayerId, TemplateId};
use crate::playout::config::PlayoutConfig;
use crate::playout::onair::{OnAirState, OnAirStore, OutCompletion, PhaseStamp};
use crate::playout::scheduler::{FrameScheduler, TickHandle};
use crate::playout::target::RenderTarget;
use crate::scene::library::{CompiledTemplate, Library};
use crate::scene::model::Phase;

/// Command rejected by the playout driver. Only the offending layer is affected.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum PlayoutError {
    #[error("unknown layer '{0}'")]
    UnknownLayer(LayerId),

    #[error("unknown template '{0}'")]
    UnknownTemplate(TemplateId),

    #[error("layer '{0}' already exists")]
    DuplicateLayer(LayerId),

    #[error("layer '{0}' is not on air")]
    NotOnAir(LayerId),
}

/// What one tick did to its layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickOutcome {
    /// Frame applied, phase still running.
    Continued,
    /// Phase completed and the next one started.
    Transitioned { from: Phase, to: Phase },
    /// `loop` completed and restarted.
    LoopRestarted,
    /// `out` completed and the pending template entered `in`.
    Switched { from: TemplateId, to: TemplateId },
    /// `out` completed with nothing queued; the layer is idle.
    Finished,
    /// External state moved the layer; the old chain was dropped and a new one started.
    Resynced { phase: Phase },
    /// External state cleared the layer; styles were reset and the chain ended.
    Abandoned,
    /// External state changed while the tick ran, so its transition was not written.
    /// The next tick adopts the new state.
    Diverged,
    /// The tick belonged to a cancelled or replaced chain and was ignored.
    Stale,
}

/// The driver's view of a running layer.
#[derive(Clone, Debug)]
struct LayerRun {
    template_id: TemplateId,
    phase: Phase,
    started_ms: f64,
    duration_ms: f64,
    handle: TickHandle,
}

impl LayerRun {
    fn stamp(&self) -> PhaseStamp {
        PhaseStamp {
            template_id: self.template_id.clone(),
            phase: self.phase,
            started_ms: Some(self.started_ms),
        }
    }

    fn matches(&self, state: &OnAirState) -> bool {
        state.stamp() == self.stamp()
    }
}

/// Per-layer `in -> loop -> out` state machine driven by an injected frame scheduler.
///
/// Every layer runs its own tick chain; all elements of a layer's template share one clock per
/// tick. The [`OnAirStore`] is authoritative: when it diverges from what a chain believes it is
/// running, the chain is dropped on its next tick.
pub struct PlayoutEngine<S, R> {
    library: Arc<Library>,
    config: PlayoutConfig,
    store: OnAirStore,
    scheduler: S,
    target: R,
    layers: BTreeMap<LayerId, Option<LayerRun>>,
}

impl<S: FrameScheduler, R: RenderTarget> PlayoutEngine<S, R> {
    /// Layers named in `config` are registered up front.
    pub fn new(library: Arc<Library>, config: PlayoutConfig, scheduler: S, target: R) -> Self {
        Self::with_store(library, config, OnAirStore::new(), scheduler, target)
    }

    /// Like [`PlayoutEngine::new`], sharing an existing on-air store with command code.
    pub fn with_store(
        library: Arc<Library>,
        config: PlayoutConfig,
        store: OnAirStore,
        scheduler: S,
        target: R,
    ) -> Self {
        let layers = config.layers.keys().map(|id| (id.clone(), None)).collect();
        Self {
            library,
            config,
            store,
            scheduler,
            target,
            layers,
        }
    }

    pub fn add_layer(&mut self, layer: impl Into<LayerId>) -> Result<(), PlayoutError> {
        let layer = layer.into();
        if self.layers.contains_key(&layer) {
            return Err(PlayoutError::DuplicateLayer(layer));
        }
        self.layers.insert(layer, None);
        Ok(())
    }

    pub fn layers(&self) -> impl Iterator<Item = &LayerId> {
        self.layers.keys()
    }

    /// Handle to the authoritative on-air state.
    pub fn store(&self) -> &OnAirStore {
        &self.store
    }

    pub fn state(&self, layer: &LayerId) -> Option<OnAirState> {
        self.store.get(layer)
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    fn ensure_layer(&self, layer: &LayerId) -> Result<(), PlayoutError> {
        if self.layers.contains_key(layer) {
            Ok(())
        } else {
            Err(PlayoutError::UnknownLayer(layer.clone()))
        }
    }

    fn template(&self, id: &TemplateId) -> Result<&CompiledTemplate, PlayoutError> {
        self.library
            .template(id)
            .ok_or_else(|| PlayoutError::UnknownTemplate(id.clone()))
    }

    fn phase_duration(&self, layer: &LayerId, template: &CompiledTemplate, phase: Phase) -> f64 {
        self.config
            .phase_duration(layer, template, self.library.phase_durations(), phase)
    }

    /// Cancel the layer's pending tick, if any, and return the run it belonged to.
    fn cancel_run(&mut self, layer: &LayerId) -> Option<LayerRun> {
        let run = self.layers.get_mut(layer)?.take()?;
        self.scheduler.cancel_tick(run.handle);
        Some(run)
    }

    fn start_run(
        &mut self,
        layer: &LayerId,
        template_id: TemplateId,
        phase: Phase,
        now_ms: f64,
        duration_ms: f64,
    ) {
        let handle = self.scheduler.request_tick(layer);
        self.layers.insert(
            layer.clone(),
            Some(LayerRun {
                template_id,
                phase,
                started_ms: now_ms,
                duration_ms,
                handle,
            }),
        );
    }

    /// Put `template` on air on `layer`, starting at `phase` (normally [`Phase::In`]).
    ///
    /// Whatever the layer was showing is cancelled and its styles are reset first.
    #[tracing::instrument(skip(self))]
    pub fn play(
        &mut self,
        layer: &LayerId,
        template: &TemplateId,
        phase: Phase,
        now_ms: f64,
    ) -> Result<(), PlayoutError> {
        self.ensure_layer(layer)?;
        let duration = {
            let t = self.template(template)?;
            self.phase_duration(layer, t, phase)
        };

        let previous = self
            .cancel_run(layer)
            .map(|run| run.template_id)
            .or_else(|| self.store.get(layer).map(|s| s.template_id));
        if let Some(prev) = previous {
            reset_template(&mut self.target, &self.library, layer, &prev);
        }

        self.store
            .begin(layer, template.clone(), phase, Some(now_ms), duration);
        self.start_run(layer, template.clone(), phase, now_ms, duration);
        tracing::debug!(%layer, %template, %phase, duration, "layer on air");
        Ok(())
    }

    /// Take the layer off air immediately: cancel its tick and reset its styles to neutral.
    /// Stopping an idle layer is a no-op.
    #[tracing::instrument(skip(self))]
    pub fn stop(&mut self, layer: &LayerId) -> Result<(), PlayoutError> {
        self.ensure_layer(layer)?;
        let run = self.cancel_run(layer);
        let state = self.store.clear(layer);
        let templates = run
            .map(|r| r.template_id)
            .into_iter()
            .chain(state.map(|s| s.template_id));
        let mut seen = Vec::new();
        for t in templates {
            if !seen.contains(&t) {
                reset_template(&mut self.target, &self.library, layer, &t);
                seen.push(t);
            }
        }
        tracing::debug!(%layer, "layer stopped");
        Ok(())
    }

    /// Queue `next` to replace the current template once its `out` completes.
    /// On an idle layer `next` goes straight to `in`.
    #[tracing::instrument(skip(self))]
    pub fn queue_switch(
        &mut self,
        layer: &LayerId,
        next: &TemplateId,
        now_ms: f64,
    ) -> Result<(), PlayoutError> {
        self.ensure_layer(layer)?;
        self.template(next)?;
        if self.store.queue_switch(layer, next.clone()) {
            tracing::debug!(%layer, %next, "switch queued");
            Ok(())
        } else {
            self.play(layer, next, Phase::In, now_ms)
        }
    }

    /// Start the `out` phase now. Already-out layers keep their running `out`.
    #[tracing::instrument(skip(self))]
    pub fn animate_out(&mut self, layer: &LayerId, now_ms: f64) -> Result<(), PlayoutError> {
        self.ensure_layer(layer)?;
        let state = self
            .store
            .get(layer)
            .ok_or_else(|| PlayoutError::NotOnAir(layer.clone()))?;
        let running_out = state.phase == Phase::Out
            && self
                .layers
                .get(layer)
                .and_then(Option::as_ref)
                .is_some_and(|run| run.matches(&state));
        if running_out {
            return Ok(());
        }

        let duration = {
            let t = self.template(&state.template_id)?;
            self.phase_duration(layer, t, Phase::Out)
        };
        self.cancel_run(layer);
        self.store
            .set_phase(layer, Phase::Out, Some(now_ms), duration);
        self.start_run(layer, state.template_id, Phase::Out, now_ms, duration);
        tracing::debug!(%layer, duration, "animating out");
        Ok(())
    }

    /// Run every tick the scheduler has due at `now_ms`.
    ///
    /// Each layer's result is reported separately; one failing layer never stops the others.
    pub fn run_frame(&mut self, now_ms: f64) -> Vec<(LayerId, Result<TickOutcome, PlayoutError>)> {
        self.scheduler
            .take_due()
            .into_iter()
            .map(|(handle, layer)| {
                let outcome = self.tick(handle, &layer, now_ms);
                if let Err(err) = &outcome {
                    tracing::warn!(%layer, %err, "tick failed");
                }
                (layer, outcome)
            })
            .collect()
    }

    /// One cooperative step of `layer`'s chain: evaluate, apply, then transition if the phase
    /// is complete, and request the next tick unless the layer went idle.
    pub fn tick(
        &mut self,
        handle: TickHandle,
        layer: &LayerId,
        now_ms: f64,
    ) -> Result<TickOutcome, PlayoutError> {
        let slot = self
            .layers
            .get_mut(layer)
            .ok_or_else(|| PlayoutError::UnknownLayer(layer.clone()))?;
        let mut run = match slot.take() {
            Some(run) if run.handle == handle => run,
            other => {
                *slot = other;
                return Ok(TickOutcome::Stale);
            }
        };

        let library = Arc::clone(&self.library);

        let Some(state) = self.store.get(layer) else {
            reset_template(&mut self.target, &library, layer, &run.template_id);
            tracing::debug!(%layer, "on-air state cleared externally, abandoning loop");
            return Ok(TickOutcome::Abandoned);
        };
        if !run.matches(&state) {
            return self.resync(layer, run, state, now_ms);
        }

        let Some(template) = library.template(&run.template_id) else {
            self.store.clear(layer);
            return Err(PlayoutError::UnknownTemplate(run.template_id));
        };

        let elapsed = (now_ms - run.started_ms).max(0.0);
        let query = EvalQuery::live(run.phase, elapsed, run.duration_ms);
        let frame = Evaluator::eval_template(template, &query);
        for el in &frame.elements {
            if !el.properties.is_empty() {
                self.target.apply(layer, &el.element_id, &el.properties);
            }
        }

        if elapsed < run.duration_ms {
            return Ok(self.continue_run(layer, run, TickOutcome::Continued));
        }

        // Writes below only land while the store still shows this run.
        let expected = run.stamp();
        let outcome = match run.phase {
            Phase::In => {
                let duration = self.phase_duration(layer, template, Phase::Loop);
                if !self
                    .store
                    .advance_phase(layer, &expected, Phase::Loop, Some(now_ms), duration)
                {
                    return Ok(self.diverged(layer, run));
                }
                run.phase = Phase::Loop;
                run.started_ms = now_ms;
                run.duration_ms = duration;
                tracing::debug!(%layer, "in -> loop");
                TickOutcome::Transitioned {
                    from: Phase::In,
                    to: Phase::Loop,
                }
            }
            Phase::Loop => {
                if !self.store.advance_phase(
                    layer,
                    &expected,
                    Phase::Loop,
                    Some(now_ms),
                    run.duration_ms,
                ) {
                    return Ok(self.diverged(layer, run));
                }
                run.started_ms = now_ms;
                TickOutcome::LoopRestarted
            }
            Phase::Out => {
                let config = &self.config;
                let completion = self.store.complete_out(layer, &expected, now_ms, |next| {
                    let t = library.template(next)?;
                    Some(config.phase_duration(layer, t, library.phase_durations(), Phase::In))
                });
                match completion {
                    OutCompletion::Diverged => return Ok(self.diverged(layer, run)),
                    OutCompletion::Cleared => {
                        reset_template(&mut self.target, &library, layer, &run.template_id);
                        tracing::debug!(%layer, "out complete, layer idle");
                        return Ok(TickOutcome::Finished);
                    }
                    OutCompletion::Rejected(next) => {
                        reset_template(&mut self.target, &library, layer, &run.template_id);
                        return Err(PlayoutError::UnknownTemplate(next));
                    }
                    OutCompletion::Switched { next, duration_ms } => {
                        reset_template(&mut self.target, &library, layer, &run.template_id);
                        reset_template(&mut self.target, &library, layer, &next);
                        let from = std::mem::replace(&mut run.template_id, next.clone());
                        run.phase = Phase::In;
                        run.started_ms = now_ms;
                        run.duration_ms = duration_ms;
                        tracing::debug!(%layer, %from, to = %next, "switched");
                        TickOutcome::Switched { from, to: next }
                    }
                }
            }
        };

        Ok(self.continue_run(layer, run, outcome))
    }

    /// Request the next tick for `run` and keep it as the layer's chain.
    fn continue_run(
        &mut self,
        layer: &LayerId,
        mut run: LayerRun,
        outcome: TickOutcome,
    ) -> TickOutcome {
        run.handle = self.scheduler.request_tick(layer);
        self.layers.insert(layer.clone(), Some(run));
        outcome
    }

    /// Keep the chain alive with its old belief; the next tick sees the mismatch and resyncs.
    fn diverged(&mut self, layer: &LayerId, run: LayerRun) -> TickOutcome {
        tracing::debug!(%layer, phase = %run.phase, "external state changed during tick");
        self.continue_run(layer, run, TickOutcome::Diverged)
    }

    /// Drop `run` and adopt the externally written `state` with a fresh chain starting now.
    fn resync(
        &mut self,
        layer: &LayerId,
        run: LayerRun,
        state: OnAirState,
        now_ms: f64,
    ) -> Result<TickOutcome, PlayoutError> {
        tracing::debug!(
            %layer,
            believed = %run.phase,
            external = %state.phase,
            "external state diverged, abandoning loop"
        );
        if state.template_id != run.template_id {
            reset_template(&mut self.target, &self.library, layer, &run.template_id);
        }
        let duration = match self.template(&state.template_id) {
            Ok(t) => self.phase_duration(layer, t, state.phase),
            Err(err) => {
                self.store.clear(layer);
                return Err(err);
            }
        };
        let adopted =
            self.store
                .advance_phase(layer, &state.stamp(), state.phase, Some(now_ms), duration);
        self.start_run(layer, state.template_id, state.phase, now_ms, duration);
        if adopted {
            Ok(TickOutcome::Resynced { phase: state.phase })
        } else {
            Ok(TickOutcome::Diverged)
        }
    }
}

fn reset_template<R: RenderTarget>(
    target: &mut R,
    library: &Library,
    layer: &LayerId,
    template: &TemplateId,
) {
    if let Some(t) = library.template(template) {
        for el in t.elements() {
            target.reset(layer, &el.id);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playout/driver.rs"]
mod tests;
