use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use rtplan_core::units::{DoseUnit, DoseValue};

/// Unit of a metric's input, result or target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ResultUnit {
    Gy,
    #[serde(rename = "cGy")]
    CGy,
    #[serde(rename = "cc")]
    Cc,
    PercentDose,
    PercentVolume,
}

impl ResultUnit {
    /// The absolute dose unit goals are compared in: Gy on Gy systems,
    /// cGy on every other system.
    pub fn for_plan_dose(plan_unit: DoseUnit) -> Self {
        match plan_unit {
            DoseUnit::Gy => ResultUnit::Gy,
            _ => ResultUnit::CGy,
        }
    }

    pub fn dose_unit(&self) -> Option<DoseUnit> {
        match self {
            ResultUnit::Gy => Some(DoseUnit::Gy),
            ResultUnit::CGy => Some(DoseUnit::CGy),
            ResultUnit::PercentDose => Some(DoseUnit::Percent),
            ResultUnit::Cc | ResultUnit::PercentVolume => None,
        }
    }

    pub fn is_absolute_dose(&self) -> bool {
        self.dose_unit().is_some_and(|unit| unit.is_absolute())
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ResultUnit::Gy => "Gy",
            ResultUnit::CGy => "cGy",
            ResultUnit::Cc => "cc",
            ResultUnit::PercentDose | ResultUnit::PercentVolume => "%",
        }
    }
}

impl fmt::Display for ResultUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A template dose (Gy) in the unit goals are compared in on this plan.
pub fn template_dose(dose_gy: f64, plan_unit: DoseUnit) -> (f64, ResultUnit) {
    let unit = ResultUnit::for_plan_dose(plan_unit);
    match unit {
        ResultUnit::CGy => (DoseValue::gy(dose_gy).to_unit(DoseUnit::CGy).dose, unit),
        _ => (dose_gy, unit),
    }
}

/// Convert a dose read from the plan into `unit`. Relative doses and plans
/// with an unknown unit pass through unchanged.
pub fn plan_dose_in(dose: f64, plan_unit: DoseUnit, unit: ResultUnit) -> f64 {
    match unit.dose_unit() {
        Some(target) if unit.is_absolute_dose() => {
            DoseValue::new(dose, plan_unit).to_unit(target).dose
        }
        _ => dose,
    }
}

/// DVH bin width for a plan's dose unit.
pub fn bin_width(plan_unit: DoseUnit) -> f64 {
    match plan_unit {
        DoseUnit::Gy => 0.01,
        _ => 0.1,
    }
}
