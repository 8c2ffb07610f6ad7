//! rtplan-optimizer
//!
//! Registers an objective template's optimization objectives on a plan and
//! starts the optimizer.

pub mod error;
pub mod mapper;
pub mod summary;

pub use crate::error::OptimizerError;
pub use crate::mapper::{OptimizationPath, apply_objectives, optimization_run};
pub use crate::summary::{OptimizationSummary, UnsupportedObjective};
