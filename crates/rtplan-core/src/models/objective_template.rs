use serde::{Deserialize, Serialize};

use super::preview::Preview;
use crate::error::CoreError;

/// Optimization objectives for a set of structures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveTemplate {
    #[serde(default)]
    pub kind: Option<String>,
    pub preview: Preview,
    #[serde(default)]
    pub helios: Helios,
    #[serde(default)]
    pub structures: Vec<StructureObjectives>,
}

/// Optimizer configuration block.
///
/// Interpolation, colour, target auto-crop and ALDO flags are carried but
/// not acted on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Helios {
    #[serde(default)]
    pub default_fixed_jaws: bool,
    #[serde(default)]
    pub interpolate: bool,
    #[serde(default)]
    pub use_colors: bool,
    #[serde(default)]
    pub target_auto_crop: bool,
    #[serde(default)]
    pub aldo: bool,
    #[serde(default)]
    pub default_smoothing_x: f64,
    #[serde(default)]
    pub default_smoothing_y: f64,
    #[serde(default)]
    pub default_minimize_dose: f64,
    #[serde(default)]
    pub default_optimization_type: Option<String>,
    /// 0 means "use the optimizer's defaults".
    #[serde(default)]
    pub max_iterations: u32,
    #[serde(default)]
    pub max_time: f64,
    #[serde(default)]
    pub normal_tissue_objective: NormalTissueObjective,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalTissueObjective {
    #[serde(default, rename = "use")]
    pub enabled: bool,
    #[serde(default)]
    pub auto: bool,
    #[serde(default)]
    pub priority: f64,
    /// mm.
    #[serde(default)]
    pub distance_from_target_border: f64,
    /// Percent of prescription.
    #[serde(default)]
    pub start_dose: f64,
    /// Percent of prescription.
    #[serde(default)]
    pub end_dose: f64,
    #[serde(default)]
    pub fall_off: f64,
    #[serde(default)]
    pub mode: Option<String>,
}

/// All objectives declared for one structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureObjectives {
    /// Structure id in the structure set.
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surface_only: bool,
    #[serde(default)]
    pub distance: Option<String>,
    #[serde(default)]
    pub sample_points: Option<u32>,
    #[serde(default)]
    pub color: Option<i64>,
    #[serde(default)]
    pub avoidance_structure_mode: Option<String>,
    #[serde(default)]
    pub objectives: Vec<Objective>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub kind: ObjectiveType,
    pub operator: ObjectiveOperator,
    /// Gy.
    pub dose: f64,
    /// Percent volume.
    #[serde(default)]
    pub volume: Option<f64>,
    pub priority: f64,
    /// gEUD shape parameter.
    #[serde(default)]
    pub parameter_a: Option<f64>,
    /// Groups line objectives together.
    #[serde(default)]
    pub group: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveType {
    Point,
    Line,
    Mean,
    #[serde(rename = "geud")]
    GeneralizedEud,
}

impl TryFrom<u8> for ObjectiveType {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ObjectiveType::Point),
            1 => Ok(ObjectiveType::Line),
            2 => Ok(ObjectiveType::Mean),
            3 => Ok(ObjectiveType::GeneralizedEud),
            _ => Err(CoreError::UnknownCode {
                kind: "objective type",
                code,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveOperator {
    Upper,
    Lower,
    Target,
    None,
}

impl TryFrom<u8> for ObjectiveOperator {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ObjectiveOperator::Upper),
            1 => Ok(ObjectiveOperator::Lower),
            2 => Ok(ObjectiveOperator::Target),
            99 => Ok(ObjectiveOperator::None),
            _ => Err(CoreError::UnknownCode {
                kind: "objective operator",
                code,
            }),
        }
    }
}
