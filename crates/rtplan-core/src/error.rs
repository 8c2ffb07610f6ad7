use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown {kind} code: {code}")]
    UnknownCode { kind: &'static str, code: u8 },

    #[error("could not classify beam technique '{technique}' with treatment style '{style}'")]
    UnclassifiedTechnique { technique: String, style: String },
}
