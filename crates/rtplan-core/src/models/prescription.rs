use serde::{Deserialize, Serialize};

use super::plan_template::StructureCode;
use crate::error::CoreError;

/// Protocol dose goals for one phase.
///
/// `items` are the plan objectives of the protocol; `measure_items` are its
/// plan measure details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub measure_items: Vec<MeasureItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Structure id.
    pub id: String,
    #[serde(default)]
    pub primary: bool,
    /// Carried for completeness; items are dispatched on `modifier`.
    pub kind: MeasureType,
    pub modifier: ItemModifier,
    /// Percent volume for at-least/at-most goals.
    #[serde(default)]
    pub parameter: f64,
    #[serde(default)]
    pub dose: Option<f64>,
    /// Target dose, Gy.
    #[serde(default)]
    pub total_dose: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureItem {
    /// Structure id.
    pub id: String,
    #[serde(default)]
    pub structure_code: Option<StructureCode>,
    pub kind: MeasureType,
    pub modifier: MeasureModifier,
    /// Target value. Absent targets are never failed.
    #[serde(default)]
    pub value: Option<f64>,
    /// The volume of a dose-at-volume goal or the dose of a volume-at-dose
    /// goal.
    #[serde(default)]
    pub type_specifier: Option<f64>,
    /// Target is absolute (Gy or cc) rather than relative (%).
    #[serde(default)]
    pub report_dqp_value_in_absolute_units: bool,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub variation_acceptable: Option<f64>,
    #[serde(default)]
    pub primary_clinical_goal: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureType {
    ConformityIndex,
    GradientMeasure,
    VolumeAtRelativeDose,
    VolumeAtAbsoluteDose,
    DoseAtRelativeVolume,
    DoseAtAbsoluteVolume,
}

impl TryFrom<u8> for MeasureType {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(MeasureType::ConformityIndex),
            1 => Ok(MeasureType::GradientMeasure),
            2 => Ok(MeasureType::VolumeAtRelativeDose),
            3 => Ok(MeasureType::VolumeAtAbsoluteDose),
            4 => Ok(MeasureType::DoseAtRelativeVolume),
            5 => Ok(MeasureType::DoseAtAbsoluteVolume),
            _ => Err(CoreError::UnknownCode {
                kind: "measure type",
                code,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemModifier {
    AtLeast,
    AtMost,
    MeanDoseIs,
    MaxDoseIs,
    MinDoseIs,
    ReferencePointReceives,
    Unknown,
    MeanDoseIsMoreThan,
    MeanDoseIsLessThan,
    MinDoseIsMoreThan,
    MaxDoseIsLessThan,
}

impl TryFrom<u8> for ItemModifier {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ItemModifier::AtLeast),
            1 => Ok(ItemModifier::AtMost),
            2 => Ok(ItemModifier::MeanDoseIs),
            3 => Ok(ItemModifier::MaxDoseIs),
            4 => Ok(ItemModifier::MinDoseIs),
            5 => Ok(ItemModifier::ReferencePointReceives),
            6 => Ok(ItemModifier::Unknown),
            7 => Ok(ItemModifier::MeanDoseIsMoreThan),
            8 => Ok(ItemModifier::MeanDoseIsLessThan),
            9 => Ok(ItemModifier::MinDoseIsMoreThan),
            10 => Ok(ItemModifier::MaxDoseIsLessThan),
            _ => Err(CoreError::UnknownCode {
                kind: "item modifier",
                code,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureModifier {
    IsMoreThan,
    IsLessThan,
    Is,
    IsGreaterThanOrEqualTo,
    IsLessThanOrEqualTo,
}

impl TryFrom<u8> for MeasureModifier {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(MeasureModifier::IsMoreThan),
            1 => Ok(MeasureModifier::IsLessThan),
            2 => Ok(MeasureModifier::Is),
            3 => Ok(MeasureModifier::IsGreaterThanOrEqualTo),
            4 => Ok(MeasureModifier::IsLessThanOrEqualTo),
            _ => Err(CoreError::UnknownCode {
                kind: "measure modifier",
                code,
            }),
        }
    }
}
