//! Dose units.
//!
//! Template doses are always authored in Gy. The planning system reports
//! dose in its own configured unit, so every comparison goes through
//! [`DoseValue::to_unit`] first.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Centigray per gray.
pub const CGY_PER_GY: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoseUnit {
    Gy,
    #[serde(rename = "cGy")]
    CGy,
    Percent,
    Unknown,
}

impl DoseUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            DoseUnit::Gy => "Gy",
            DoseUnit::CGy => "cGy",
            DoseUnit::Percent => "%",
            DoseUnit::Unknown => "",
        }
    }

    /// True for Gy and cGy.
    pub fn is_absolute(&self) -> bool {
        matches!(self, DoseUnit::Gy | DoseUnit::CGy)
    }
}

impl fmt::Display for DoseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoseValue {
    pub dose: f64,
    pub unit: DoseUnit,
}

impl DoseValue {
    pub fn new(dose: f64, unit: DoseUnit) -> Self {
        Self { dose, unit }
    }

    pub fn gy(dose: f64) -> Self {
        Self::new(dose, DoseUnit::Gy)
    }

    /// A template dose (Gy) expressed in the planning system's unit.
    ///
    /// Systems configured for cGy get the value scaled by 100; every other
    /// system unit receives the dose in Gy unchanged.
    pub fn from_template_gy(dose_gy: f64, system_unit: DoseUnit) -> Self {
        match system_unit {
            DoseUnit::CGy => Self::new(dose_gy * CGY_PER_GY, DoseUnit::CGy),
            _ => Self::gy(dose_gy),
        }
    }

    /// Convert between Gy and cGy. Relative or unknown units on either side
    /// leave the value untouched.
    pub fn to_unit(self, unit: DoseUnit) -> Self {
        match (self.unit, unit) {
            (DoseUnit::Gy, DoseUnit::CGy) => Self::new(self.dose * CGY_PER_GY, unit),
            (DoseUnit::CGy, DoseUnit::Gy) => Self::new(self.dose / CGY_PER_GY, unit),
            _ => self,
        }
    }
}

impl fmt::Display for DoseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.dose, self.unit)
    }
}
