use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::paths;

/// Shape version written to disk. Versions below this are upgraded by
/// [`migrate`] on load.
const CURRENT_VERSION: u32 = 1;

/// Where the catalog reads its templates from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub image_server: String,
    /// Added in v1. Pre-versioned configs only named the image server and
    /// get the standard share layout on migration.
    pub protocol_dir: String,
    pub objective_dir: String,
    pub plan_dir: String,
}

impl CatalogConfig {
    /// Standard template share layout on `image_server`.
    pub fn for_image_server(image_server: impl Into<String>) -> Self {
        let image_server = image_server.into();
        Self {
            config_version: CURRENT_VERSION,
            protocol_dir: paths::protocol_dir(&image_server),
            objective_dir: paths::objective_dir(&image_server),
            plan_dir: paths::plan_dir(&image_server),
            image_server,
        }
    }
}

/// `<platform config dir>/rtplan/catalog.json`.
pub fn default_config_path() -> Result<PathBuf, CatalogError> {
    let base = dirs::config_dir().ok_or(CatalogError::NoConfigDir)?;
    Ok(base.join("rtplan").join("catalog.json"))
}

pub fn load_config(path: &Path) -> Result<CatalogConfig, CatalogError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    // Older layouts are upgraded as untyped JSON.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    Ok(serde_json::from_value(migrated)?)
}

/// Upgrades a config document written at `from_version` one step at a time.
fn migrate(mut json: serde_json::Value, from_version: u32) -> Result<serde_json::Value, CatalogError> {
    if from_version > CURRENT_VERSION {
        return Err(CatalogError::UnsupportedConfigVersion {
            found: from_version,
            supported: CURRENT_VERSION,
        });
    }

    // v0 → v1: derive the three template directories from the image server
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| CatalogError::InvalidConfig("config is not a JSON object".into()))?;
        let server = obj
            .get("image_server")
            .and_then(|v| v.as_str())
            .ok_or_else(|| CatalogError::InvalidConfig("image_server is missing".into()))?
            .to_string();
        for (key, dir) in [
            ("protocol_dir", paths::protocol_dir(&server)),
            ("objective_dir", paths::objective_dir(&server)),
            ("plan_dir", paths::plan_dir(&server)),
        ] {
            obj.entry(key).or_insert(serde_json::Value::String(dir));
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated catalog config v0 → v1 (added template directories)");
    }

    Ok(json)
}

pub fn save_config(path: &Path, config: &CatalogConfig) -> Result<(), CatalogError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // Saved files carry CURRENT_VERSION even when loaded from an older one.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    // Readers never see a partially written file.
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "catalog config saved");
    Ok(())
}
