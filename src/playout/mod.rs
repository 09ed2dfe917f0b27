//! On-air playback: per-layer phase sequencing on an injected frame scheduler.
//!
//! The [`driver::PlayoutEngine`] owns the tick chains, [`onair::OnAirStore`] owns the
//! authoritative per-layer state, and a [`target::RenderTarget`] receives computed styles.

pub mod config;
pub mod driver;
pub mod onair;
/// Frame scheduling capability and deterministic implementations.
pub mod scheduler;
pub mod target;

pub use driver::{PlayoutEngine, PlayoutError, TickOutcome};
