use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::units::ResultUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum MetricType {
    DoseAtVolume,
    VolumeAtDose,
    MaxDose,
    MeanDose,
    MinDose,
    ConformityIndex,
    GradientMeasure,
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MetricType::DoseAtVolume => "Dose at Volume",
            MetricType::VolumeAtDose => "Volume at Dose",
            MetricType::MaxDose => "Max Dose",
            MetricType::MeanDose => "Mean Dose",
            MetricType::MinDose => "Min Dose",
            MetricType::ConformityIndex => "Conformity Index",
            MetricType::GradientMeasure => "Gradient Measure",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PassResult {
    Pass,
    Fail,
    NotApplicable,
}

impl PassResult {
    pub fn from_bool(pass: bool) -> Self {
        if pass { PassResult::Pass } else { PassResult::Fail }
    }
}

/// One evaluated protocol goal.
///
/// Numeric fields stay `None` when evaluation stopped before reaching them,
/// e.g. for a structure that is not on the structure set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DoseMetric {
    pub structure_id: String,
    pub metric_type: Option<MetricType>,
    /// The goal, e.g. "Rectum V50Gy[%] is less than 35 %".
    pub metric_text: String,
    pub input_value: Option<f64>,
    pub input_unit: Option<ResultUnit>,
    pub result_value: Option<f64>,
    pub result_unit: Option<ResultUnit>,
    pub target_value: Option<f64>,
    pub target_unit: Option<ResultUnit>,
    pub pass: PassResult,
    /// What was measured, or why nothing was.
    pub result_text: String,
}

impl DoseMetric {
    pub(crate) fn new(structure_id: &str) -> Self {
        Self {
            structure_id: structure_id.to_string(),
            metric_type: None,
            metric_text: String::new(),
            input_value: None,
            input_unit: None,
            result_value: None,
            result_unit: None,
            target_value: None,
            target_unit: None,
            pass: PassResult::NotApplicable,
            result_text: String::new(),
        }
    }

    pub(crate) fn not_applicable(mut self, reason: impl Into<String>) -> Self {
        self.pass = PassResult::NotApplicable;
        self.result_text = reason.into();
        self
    }
}

/// How a result is held against its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Comparison {
    Equal,
    LessThan,
    MoreThan,
    AtLeast,
    AtMost,
}

impl Comparison {
    /// Equality is exact, as the planning system reports it.
    pub(crate) fn holds(self, result: f64, target: f64) -> bool {
        match self {
            Comparison::Equal => result == target,
            Comparison::LessThan => result < target,
            Comparison::MoreThan => result > target,
            Comparison::AtLeast => result >= target,
            Comparison::AtMost => result <= target,
        }
    }

    pub(crate) fn phrase(self) -> &'static str {
        match self {
            Comparison::Equal => "equals",
            Comparison::LessThan => "is less than",
            Comparison::MoreThan => "is more than",
            Comparison::AtLeast => "is at least",
            Comparison::AtMost => "is at most",
        }
    }
}
