//! novagfx is the keyframe animation engine behind broadcast-graphics templates.
//!
//! - [`eval::evaluator::Evaluator`] computes an element's animated properties at a timeline
//!   position (authoring preview scrubbing and live playout alike); it is pure.
//! - [`playout::PlayoutEngine`] sequences each layer through `in -> loop -> out` on an injected
//!   frame scheduler and applies the results to an injected render target.
#![forbid(unsafe_code)]

pub mod animation;
pub mod eval;
pub mod foundation;
pub mod playout;
pub mod scene;

pub use crate::animation::ease::{Easing, EasingDef, UnknownEasingError};
pub use crate::animation::interpolate::{InterpolationError, interpolate, interpolate_property};
pub use crate::animation::track::{Track, TrackKeyframe, resolve_at};
pub use crate::animation::value::{PropertyMap, PropertyValue};
pub use crate::eval::evaluator::{
    EvalQuery, EvaluatedFrame, Evaluator, TimelineMode, get_animated_properties,
};
pub use crate::foundation::error::{NovaError, NovaResult};
pub use crate::foundation::ids::{AnimationId, ElementId, LayerId, TemplateId};
pub use crate::playout::config::PlayoutConfig;
pub use crate::playout::onair::{OnAirState, OnAirStore, OutCompletion, PhaseStamp};
pub use crate::playout::scheduler::{FrameQueue, FrameScheduler, TickHandle, VirtualClock};
pub use crate::playout::target::{RecordingTarget, RenderTarget, StyleUpdate};
pub use crate::playout::{PlayoutEngine, PlayoutError, TickOutcome};
pub use crate::scene::library::{CompiledTemplate, Library};
pub use crate::scene::model::{
    Animation, Element, Keyframe, Phase, PhaseDurations, Project, Template,
};
