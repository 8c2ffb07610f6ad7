use serde::{Deserialize, Serialize};

use super::preview::Preview;
use crate::geometry::{FitMargins, JawRect, Vector3};

/// Millimetres per centimetre; template jaw coordinates are authored in cm.
const MM_PER_CM: f64 = 10.0;

/// A plan template: prescription defaults plus an ordered list of fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanTemplate {
    pub preview: Preview,
    /// 0–100.
    #[serde(default)]
    pub prescribed_percentage: Option<f64>,
    /// Gy.
    #[serde(default)]
    pub dose_per_fraction: Option<f64>,
    #[serde(default)]
    pub fraction_count: Option<u32>,
    #[serde(default)]
    pub treatment_style: Option<String>,
    #[serde(default)]
    pub prescription_site: Option<PrescriptionSite>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl PlanTemplate {
    /// Fields that become treatment beams. Setup fields are skipped.
    pub fn treatment_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.setup)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionSite {
    #[serde(default)]
    pub volume_id: Option<String>,
    #[serde(default)]
    pub volume_type: Option<String>,
    #[serde(default)]
    pub volume_code: Option<String>,
    #[serde(default)]
    pub structure_code: Option<StructureCode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureCode {
    #[serde(default)]
    pub code_scheme: String,
    pub code: String,
    #[serde(default)]
    pub code_version: String,
}

/// The structure a field is aimed at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub volume_id: Option<String>,
    #[serde(default)]
    pub structure_code: Option<StructureCode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    #[serde(default)]
    pub setup: bool,
    #[serde(default)]
    pub fixed_ssd: bool,
    #[serde(default)]
    pub using_mlc: bool,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub target: Target,
    pub treatment_unit: String,
    pub technique: String,
    pub energy: Energy,
    #[serde(default)]
    pub primary_fluence_mode: Option<String>,
    pub dose_rate: i32,
    pub gantry: Gantry,
    pub collimator: Collimator,
    #[serde(default)]
    pub table_rtn: Option<f64>,
    #[serde(default)]
    pub tolerance_table_id: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub field_margin: FieldMargin,
    pub isocenter: Isocenter,
    #[serde(default)]
    pub mlc_plans: Vec<MlcPlan>,
}

impl Field {
    /// The MLC margin of the first MLC plan, if it defines a left margin.
    pub fn mlc_margin(&self) -> Option<&MlcMargin> {
        self.mlc_plans
            .first()
            .and_then(|plan| plan.mlc_margin.as_ref())
            .filter(|margin| margin.left.is_some())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Energy {
    pub energy_kv: f64,
    /// Modality suffix, e.g. "X" or "E".
    pub kind: String,
}

impl Energy {
    /// Machine energy mode, e.g. 6000 kV photons → "6X".
    ///
    /// The kV value is rounded to the nearest integer (ties to even) before
    /// the integer division, so 5999.6 kV reads as "6X".
    pub fn mode(&self) -> String {
        let kv = self.energy_kv.round_ties_even() as i64;
        format!("{}{}", kv / 1000, self.kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gantry {
    /// Start angle, degrees.
    pub rtn: f64,
    #[serde(default)]
    pub stop_rtn: Option<f64>,
    /// "CW", "CC" or "NONE".
    #[serde(default)]
    pub rtn_direction: String,
}

/// Static collimator settings; jaw coordinates in cm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collimator {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub rtn: f64,
    /// Which jaw pairs may be fitted independently, e.g. "XY" or "X".
    #[serde(default)]
    pub mode: String,
}

impl Collimator {
    pub fn jaws_mm(&self) -> JawRect {
        JawRect::new(
            self.x1 * MM_PER_CM,
            self.y1 * MM_PER_CM,
            self.x2 * MM_PER_CM,
            self.y2 * MM_PER_CM,
        )
    }

    pub fn fit_x(&self) -> bool {
        self.mode.contains('X')
    }

    pub fn fit_y(&self) -> bool {
        self.mode.contains('Y')
    }
}

/// Jaw margin around the target, mm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMargin {
    #[serde(default)]
    pub optimize_coll_rtn: bool,
    #[serde(default)]
    pub elliptical_margin: bool,
    #[serde(default)]
    pub bev_margin: bool,
    #[serde(default)]
    pub left: Option<f64>,
    #[serde(default)]
    pub right: Option<f64>,
    #[serde(default)]
    pub top: Option<f64>,
    #[serde(default)]
    pub bottom: Option<f64>,
}

impl FieldMargin {
    /// Missing sides fit flush to the target.
    pub fn fit_margins(&self) -> FitMargins {
        FitMargins::new(
            self.left.unwrap_or(0.0),
            self.bottom.unwrap_or(0.0),
            self.right.unwrap_or(0.0),
            self.top.unwrap_or(0.0),
        )
    }
}

/// MLC margin around the target, mm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MlcMargin {
    #[serde(default)]
    pub optimize_coll_rtn: bool,
    #[serde(default)]
    pub elliptical_margin: bool,
    #[serde(default)]
    pub bev_margin: bool,
    #[serde(default)]
    pub jaw_fitting_mode: Option<String>,
    #[serde(default)]
    pub left: Option<f64>,
    #[serde(default)]
    pub right: Option<f64>,
    #[serde(default)]
    pub top: Option<f64>,
    #[serde(default)]
    pub bottom: Option<f64>,
}

impl MlcMargin {
    /// Missing bottom/right/top sides take the left margin. `None` when
    /// the left margin itself is missing.
    pub fn fit_margins(&self) -> Option<FitMargins> {
        let left = self.left?;
        Some(FitMargins::new(
            left,
            self.bottom.unwrap_or(left),
            self.right.unwrap_or(left),
            self.top.unwrap_or(left),
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MlcPlan {
    pub id: String,
    #[serde(default)]
    pub dynamic: bool,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub segment_count: u32,
    #[serde(default)]
    pub mlc_margin: Option<MlcMargin>,
    #[serde(default)]
    pub contour_meet_point: String,
    #[serde(default)]
    pub closed_meet_point: String,
    #[serde(default)]
    pub target: Option<Target>,
}

/// Isocenter offsets (mm) and the rule that places them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Isocenter {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub placement: IsocenterPlacement,
}

impl Isocenter {
    pub fn offset(&self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }
}

/// Read from any casing. Codes outside the known set read as `None`, which
/// places the isocenter at the user origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum IsocenterPlacement {
    /// At image (user) origin.
    Aio,
    /// At field target structure center.
    Afts,
    /// At image center.
    Aic,
    /// At viewing plane intersection.
    Avpi,
    /// Relative to field target structure center.
    Rfts,
    /// Relative to image (user) origin.
    Rio,
    /// Relative to image center.
    Ric,
    /// Relative to viewing plane intersection.
    Rvpi,
    #[default]
    None,
}

impl From<String> for IsocenterPlacement {
    fn from(code: String) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "AIO" => IsocenterPlacement::Aio,
            "AFTS" => IsocenterPlacement::Afts,
            "AIC" => IsocenterPlacement::Aic,
            "AVPI" => IsocenterPlacement::Avpi,
            "RFTS" => IsocenterPlacement::Rfts,
            "RIO" => IsocenterPlacement::Rio,
            "RIC" => IsocenterPlacement::Ric,
            "RVPI" => IsocenterPlacement::Rvpi,
            _ => IsocenterPlacement::None,
        }
    }
}

impl IsocenterPlacement {
    /// Placements that need a target structure to resolve.
    pub fn uses_target(&self) -> bool {
        matches!(self, IsocenterPlacement::Afts | IsocenterPlacement::Rfts)
    }
}
