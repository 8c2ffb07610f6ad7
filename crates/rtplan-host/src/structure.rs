use serde::{Deserialize, Serialize};

use rtplan_core::geometry::Vector3;
use rtplan_core::models::StructureCode;

/// DICOM type of planning target volumes.
pub const PTV_DICOM_TYPE: &str = "PTV";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub id: String,
    /// DICOM RT ROI interpreted type, e.g. "PTV", "ORGAN".
    pub dicom_type: String,
    #[serde(default)]
    pub codes: Vec<StructureCode>,
    /// No contours on any slice.
    #[serde(default)]
    pub is_empty: bool,
    pub center_point: Vector3,
    /// Bounding-box extent along each axis, mm.
    #[serde(default)]
    pub extent: Vector3,
    #[serde(default)]
    pub volume_cc: f64,
}

impl Structure {
    /// The code used to match template structure codes.
    pub fn primary_code(&self) -> Option<&StructureCode> {
        self.codes.first()
    }
}

/// Image reference points, patient coordinates in mm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageGeometry {
    pub user_origin: Vector3,
    /// Geometric origin of the image volume.
    pub origin: Vector3,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureSet {
    pub id: String,
    pub image: ImageGeometry,
    #[serde(default)]
    pub structures: Vec<Structure>,
}

impl StructureSet {
    pub fn structure(&self, id: &str) -> Option<&Structure> {
        self.structures.iter().find(|s| s.id == id)
    }

    /// First structure whose primary code matches `code`.
    pub fn structure_by_code(&self, code: &str) -> Option<&Structure> {
        self.structures
            .iter()
            .find(|s| s.primary_code().is_some_and(|c| c.code == code))
    }

    /// First structure whose DICOM type contains `dicom_type`.
    pub fn structure_by_type(&self, dicom_type: &str) -> Option<&Structure> {
        self.structures
            .iter()
            .find(|s| s.dicom_type.contains(dicom_type))
    }
}
