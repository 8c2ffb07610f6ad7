//! rtplan-core
//!
//! Pure domain types for clinical templates: protocols, plan templates,
//! objective templates and prescriptions, plus the unit and geometry
//! vocabulary shared by every other rtplan crate. No planning-system
//! dependency lives here.

pub mod beam;
pub mod classify;
pub mod error;
pub mod geometry;
pub mod models;
pub mod units;

pub use error::CoreError;
