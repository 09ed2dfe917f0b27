//! Easing curves, typed CSS-like values and the keyframe track resolver.
//!
//! Everything here is pure: values are parsed once when a [`track::Track`] is built and
//! each sample is only math plus serialization.

/// Color parsing, blending and notation-preserving serialization.
pub mod color;
/// Easing curves (named, cubic-bezier, steps).
pub mod ease;
/// CSS filter lists (`blur()`, `brightness()`...) and their blending.
pub mod filter;
/// Shape-aware interpolation between two authored values.
pub mod interpolate;
/// Keyframe track resolver.
pub mod track;
/// CSS transform function lists, blending and affine conversion.
pub mod transform;
/// Property values and their parsed, typed forms.
pub mod value;
