//! Skill evaluation.
//!
//! Classifies a single skill observation into a qualitative state.

pub mod classifier;

pub use classifier::*;
