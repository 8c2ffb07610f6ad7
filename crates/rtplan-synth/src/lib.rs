//! rtplan-synth
//!
//! Turns a plan template into beams on a new external plan: course
//! creation, per-field beam construction, isocenter placement, collimator
//! and MLC fitting, the VMAT jaw-width limit and prescription assignment.

pub mod course;
pub mod error;
pub mod isocenter;
pub mod jaw_limit;
pub mod prescription;
pub mod synthesizer;
pub mod target;

pub use crate::error::SynthError;
pub use crate::synthesizer::{SynthesisOverrides, SynthesizedPlan, synthesize_plan};
