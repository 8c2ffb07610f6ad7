//! rtplan-compliance
//!
//! Evaluates a plan (or plan sum) against the dose goals of a clinical
//! protocol. Evaluation never fails as a whole: every goal yields exactly
//! one [`DoseMetric`], and goals that cannot be judged are reported as
//! not applicable.

pub mod dvh_lookup;
pub mod item;
pub mod measure;
pub mod metric;
pub mod report;
pub mod units;

pub use crate::metric::{DoseMetric, MetricType, PassResult};
pub use crate::report::{ComplianceReport, evaluate_protocol};
pub use crate::units::ResultUnit;
