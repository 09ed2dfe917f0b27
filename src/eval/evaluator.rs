use std::collections::HashMap;

use crate::animation::transform::TransformBundle;
use crate::animation::value::{PropertyMap, PropertyValue};
use crate::foundation::error::{NovaError, NovaResult};
use crate::foundation::ids::{AnimationId, ElementId, TemplateId};
use crate::scene::library::{CompiledAnimation, CompiledTemplate};
use crate::scene::model::{Animation, Element, Keyframe, Phase};

/// Where the time value of an [`EvalQuery`] comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineMode {
    /// Authoring preview: `time_ms` is a caller-driven playhead.
    Scrub,
    /// On-air: `time_ms` is wall-clock time elapsed since the phase started.
    Live,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvalQuery {
    pub time_ms: f64,
    pub phase: Phase,
    pub mode: TimelineMode,
    /// Duration of `phase` for the template being evaluated.
    pub phase_duration_ms: f64,
}

impl EvalQuery {
    pub fn live(phase: Phase, elapsed_ms: f64, phase_duration_ms: f64) -> Self {
        Self {
            time_ms: elapsed_ms,
            phase,
            mode: TimelineMode::Live,
            phase_duration_ms,
        }
    }

    pub fn scrub(phase: Phase, playhead_ms: f64, phase_duration_ms: f64) -> Self {
        Self {
            time_ms: playhead_ms,
            phase,
            mode: TimelineMode::Scrub,
            phase_duration_ms,
        }
    }
}

/// Normalized track position of `animation` for `query`, in `0..=1`.
///
/// Before the delay elapses the position is held at `0`. A zero-length animation jumps to `1`
/// once its delay has passed. Live time is floored at `0` and, when the animation has no
/// duration of its own, capped at the phase duration.
pub fn animation_position(animation: &Animation, query: &EvalQuery) -> f64 {
    let mut time = if query.time_ms.is_finite() {
        query.time_ms
    } else {
        0.0
    };
    let phase_ms = query.phase_duration_ms.max(0.0);
    if query.mode == TimelineMode::Live {
        time = time.max(0.0);
        if animation.duration_ms.is_none() {
            time = time.min(phase_ms);
        }
    }

    let delay = animation.delay_ms;
    if time <= delay {
        return 0.0;
    }
    let duration = animation.duration_ms.unwrap_or(phase_ms);
    if duration <= 0.0 {
        return 1.0;
    }
    ((time - delay) / duration).clamp(0.0, 1.0)
}

fn sample(compiled: &CompiledAnimation, query: &EvalQuery) -> (f64, PropertyMap) {
    let position = animation_position(&compiled.animation, query);
    (position, compiled.track.resolve_at(position))
}

/// One element's computed properties at one instant.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EvaluatedElement {
    pub element_id: ElementId,
    /// Track position, `None` when the element has no animation for this phase.
    pub position: Option<f64>,
    pub properties: PropertyMap,
}

impl EvaluatedElement {
    /// Matrix form of the computed `transform`, for renderers that do not speak CSS.
    pub fn transform_affine(&self) -> Option<kurbo::Affine> {
        match self.properties.get("transform")? {
            PropertyValue::Text(s) => TransformBundle::parse(s)?.to_affine(),
            PropertyValue::Number(_) => None,
        }
    }
}

/// Computed snapshot of a whole template at one instant.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EvaluatedFrame {
    pub template_id: TemplateId,
    pub phase: Phase,
    pub time_ms: f64,
    pub elements: Vec<EvaluatedElement>,
}

pub struct Evaluator;

impl Evaluator {
    /// Animated properties of `element` for `query`.
    ///
    /// An element without an animation for the queried phase yields an empty map; it keeps its
    /// static authored styles.
    pub fn animated_properties(
        template: &CompiledTemplate,
        element: &ElementId,
        query: &EvalQuery,
    ) -> NovaResult<PropertyMap> {
        if template.element(element).is_none() {
            return Err(NovaError::evaluation(format!(
                "template '{}' has no element '{element}'",
                template.id
            )));
        }
        Ok(template
            .animation(element, query.phase)
            .map(|a| sample(a, query).1)
            .unwrap_or_default())
    }

    /// Evaluate every element of `template` against one shared clock.
    #[tracing::instrument(skip(template), fields(id = %template.id))]
    pub fn eval_template(template: &CompiledTemplate, query: &EvalQuery) -> EvaluatedFrame {
        let elements = template
            .elements()
            .iter()
            .map(|el| {
                let (position, properties) = match template.animation(&el.id, query.phase) {
                    Some(a) => {
                        let (pos, props) = sample(a, query);
                        (Some(pos), props)
                    }
                    None => (None, PropertyMap::new()),
                };
                EvaluatedElement {
                    element_id: el.id.clone(),
                    position,
                    properties,
                }
            })
            .collect();

        EvaluatedFrame {
            template_id: template.id.clone(),
            phase: query.phase,
            time_ms: query.time_ms,
            elements,
        }
    }
}

/// Record-level evaluation straight from persistence rows, without a compiled library.
///
/// Invalid records (bad positions, negative timing) fail open: a warning is logged and the
/// element keeps its static styles.
pub fn get_animated_properties(
    element: &Element,
    animations: &[Animation],
    keyframes_by_animation: &HashMap<AnimationId, Vec<Keyframe>>,
    query: &EvalQuery,
) -> PropertyMap {
    let Some(animation) = animations
        .iter()
        .find(|a| a.element_id == element.id && a.phase == query.phase)
    else {
        return PropertyMap::new();
    };
    let keyframes = keyframes_by_animation
        .get(&animation.id)
        .map(Vec::as_slice)
        .unwrap_or_default();
    match CompiledAnimation::compile(animation, keyframes) {
        Ok(compiled) => sample(&compiled, query).1,
        Err(err) => {
            tracing::warn!(element = %element.id, %err, "animation skipped");
            PropertyMap::new()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
