use rtplan_host::HostError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("no target structure found for field {field_id}")]
    TargetNotFound { field_id: String },

    #[error("treatment style not supported: {0}")]
    UnsupportedTreatmentStyle(String),

    #[error(
        "field {field_id}: could not classify technique '{technique}' with treatment style '{style}'"
    )]
    UnclassifiedTechnique {
        field_id: String,
        technique: String,
        style: String,
    },

    #[error("field {field_id}: missing {field}")]
    MissingField {
        field_id: String,
        field: &'static str,
    },

    #[error("planning system error: {0}")]
    Host(#[from] HostError),
}
