use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("template directory {dir} cannot be listed: {source}")]
    TemplateDir {
        dir: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no platform config directory found")]
    NoConfigDir,

    #[error("config_version {found} is newer than this build supports ({supported})")]
    UnsupportedConfigVersion { found: u32, supported: u32 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
