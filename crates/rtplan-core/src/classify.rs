//! Classification of free-text template fields.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_uppercase().contains(&needle.to_uppercase())
}

/// How a treatment field is turned into a beam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeamTechnique {
    Arc,
    Imrt,
    Conformal,
}

impl BeamTechnique {
    /// The field's own technique wins when it names an arc; otherwise the
    /// template-wide treatment style decides.
    pub fn classify(technique: &str, treatment_style: &str) -> Result<Self, CoreError> {
        if contains_ignore_case(technique, "ARC") {
            Ok(BeamTechnique::Arc)
        } else if contains_ignore_case(treatment_style, "IMRT") {
            Ok(BeamTechnique::Imrt)
        } else if contains_ignore_case(treatment_style, "CONFORMAL") {
            Ok(BeamTechnique::Conformal)
        } else {
            Err(CoreError::UnclassifiedTechnique {
                technique: technique.to_string(),
                style: treatment_style.to_string(),
            })
        }
    }
}
