//! rtplan-host
//!
//! The narrow surface of the treatment-planning system that the template
//! engine drives: structure sets, beam construction, optimization setup and
//! dose-volume queries. Everything here is synchronous; each call blocks
//! until the planning system has finished.
//!
//! [`memory`] implements the traits in-process and records every call, for
//! dry runs and tests.

pub mod dvh;
pub mod error;
pub mod memory;
pub mod plan;
pub mod structure;

pub use crate::error::HostError;
pub use crate::plan::{ExternalPlan, OptimizationSetup, PlanningHost, PlanningItem};
pub use crate::structure::{ImageGeometry, Structure, StructureSet};
