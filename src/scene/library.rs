use std::collections::{BTreeMap, HashMap};

use crate::animation::ease::{Easing, EasingDef};
use crate::animation::track::{Track, TrackKeyframe};
use crate::foundation::error::{NovaError, NovaResult};
use crate::foundation::ids::{AnimationId, ElementId, TemplateId};
use crate::scene::model::{Animation, Element, Keyframe, Phase, PhaseDurations, Project, Template};

/// Resolve an authored easing, falling back to linear on unknown names.
fn resolve_easing(def: Option<&EasingDef>, fallback: Easing, context: &str) -> Easing {
    match def.map(EasingDef::resolve) {
        None => fallback,
        Some(Ok(e)) => e,
        Some(Err(err)) => {
            tracing::warn!(%err, context, "falling back to linear easing");
            Easing::Linear
        }
    }
}

/// An animation with its easing resolved and its keyframes compiled into a track.
#[derive(Clone, Debug)]
pub struct CompiledAnimation {
    pub animation: Animation,
    pub easing: Easing,
    pub track: Track,
}

impl CompiledAnimation {
    /// Validate timing and keyframe positions, then build the track.
    ///
    /// `keyframes` must already be filtered to this animation.
    pub fn compile<'a>(
        animation: &Animation,
        keyframes: impl IntoIterator<Item = &'a Keyframe>,
    ) -> NovaResult<Self> {
        let id = &animation.id;
        if !animation.delay_ms.is_finite() || animation.delay_ms < 0.0 {
            return Err(NovaError::validation(format!(
                "animation '{id}': delay_ms must be finite and >= 0 (got {})",
                animation.delay_ms
            )));
        }
        if let Some(d) = animation.duration_ms {
            if !d.is_finite() || d < 0.0 {
                return Err(NovaError::validation(format!(
                    "animation '{id}': duration_ms must be finite and >= 0 (got {d})"
                )));
            }
        }

        let easing = resolve_easing(
            animation.easing.as_ref(),
            animation.phase.default_easing(),
            id.as_str(),
        );

        let mut keys = Vec::new();
        for k in keyframes {
            if !k.position.is_finite() || !(0.0..=1.0).contains(&k.position) {
                return Err(NovaError::validation(format!(
                    "animation '{id}': keyframe position must be within [0, 1] (got {})",
                    k.position
                )));
            }
            keys.push(TrackKeyframe {
                position: k.position,
                properties: k.properties.clone(),
                easing: k
                    .easing
                    .as_ref()
                    .map(|def| resolve_easing(Some(def), Easing::Linear, id.as_str())),
            });
        }

        Ok(Self {
            animation: animation.clone(),
            easing,
            track: Track::new(keys, easing),
        })
    }
}

/// Validated, indexed form of a [`Template`].
#[derive(Clone, Debug)]
pub struct CompiledTemplate {
    pub id: TemplateId,
    pub name: Option<String>,
    elements: Vec<Element>,
    animations: HashMap<(ElementId, Phase), CompiledAnimation>,
    phase_durations: Option<PhaseDurations>,
}

impl CompiledTemplate {
    #[tracing::instrument(skip(template), fields(id = %template.id))]
    pub fn compile(template: &Template) -> NovaResult<Self> {
        let tid = &template.id;

        let mut element_ids = HashMap::new();
        for (i, el) in template.elements.iter().enumerate() {
            if element_ids.insert(el.id.clone(), i).is_some() {
                return Err(NovaError::validation(format!(
                    "template '{tid}': duplicate element id '{}'",
                    el.id
                )));
            }
        }
        if let Some(pd) = &template.phase_durations {
            pd.validate(&format!("template '{tid}'"))?;
        }

        let mut keyframes_by_animation: HashMap<&AnimationId, Vec<&Keyframe>> = HashMap::new();
        for a in &template.animations {
            if !element_ids.contains_key(&a.element_id) {
                return Err(NovaError::validation(format!(
                    "template '{tid}': animation '{}' references unknown element '{}'",
                    a.id, a.element_id
                )));
            }
            if keyframes_by_animation.insert(&a.id, Vec::new()).is_some() {
                return Err(NovaError::validation(format!(
                    "template '{tid}': duplicate animation id '{}'",
                    a.id
                )));
            }
        }
        for k in &template.keyframes {
            match keyframes_by_animation.get_mut(&k.animation_id) {
                Some(keys) => keys.push(k),
                None => {
                    return Err(NovaError::validation(format!(
                        "template '{tid}': keyframe references unknown animation '{}'",
                        k.animation_id
                    )));
                }
            }
        }

        let mut animations = HashMap::new();
        for a in &template.animations {
            let keys = keyframes_by_animation
                .remove(&a.id)
                .unwrap_or_default();
            let compiled = CompiledAnimation::compile(a, keys)?;
            let slot = (a.element_id.clone(), a.phase);
            if animations.insert(slot, compiled).is_some() {
                return Err(NovaError::validation(format!(
                    "template '{tid}': element '{}' has more than one '{}' animation",
                    a.element_id, a.phase
                )));
            }
        }

        tracing::debug!(
            elements = template.elements.len(),
            animations = animations.len(),
            "compiled template"
        );

        Ok(Self {
            id: tid.clone(),
            name: template.name.clone(),
            elements: template.elements.clone(),
            animations,
            phase_durations: template.phase_durations,
        })
    }

    /// Elements in authored order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub fn animation(&self, element: &ElementId, phase: Phase) -> Option<&CompiledAnimation> {
        self.animations.get(&(element.clone(), phase))
    }

    pub fn phase_durations(&self) -> Option<&PhaseDurations> {
        self.phase_durations.as_ref()
    }
}

/// All templates of a project, compiled once and shared by evaluation and playout.
#[derive(Clone, Debug, Default)]
pub struct Library {
    templates: BTreeMap<TemplateId, CompiledTemplate>,
    phase_durations: PhaseDurations,
}

impl Library {
    pub fn compile(project: &Project) -> NovaResult<Self> {
        project.phase_durations.validate("project")?;
        let mut templates = BTreeMap::new();
        for t in &project.templates {
            let compiled = CompiledTemplate::compile(t)?;
            if templates.insert(t.id.clone(), compiled).is_some() {
                return Err(NovaError::validation(format!(
                    "duplicate template id '{}'",
                    t.id
                )));
            }
        }
        Ok(Self {
            templates,
            phase_durations: project.phase_durations,
        })
    }

    pub fn template(&self, id: &TemplateId) -> Option<&CompiledTemplate> {
        self.templates.get(id)
    }

    pub fn templates(&self) -> impl Iterator<Item = &CompiledTemplate> {
        self.templates.values()
    }

    /// Project-level default phase durations.
    pub fn phase_durations(&self) -> &PhaseDurations {
        &self.phase_durations
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/library.rs"]
mod tests;
