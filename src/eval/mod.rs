//! Pure evaluation of animated properties at a timeline position.

pub mod evaluator;
