use rtplan_catalog::config::{load_config, save_config};
use rtplan_catalog::{CatalogConfig, CatalogError, paths};

#[test]
fn image_server_layout() {
    assert_eq!(
        paths::protocol_dir("hospImgSrv"),
        r"\\hospImgSrv\va_data$\programdata\vision\templates\protocol"
    );
    assert_eq!(
        paths::plan_dir(r"\\192.168.88.130"),
        r"\\192.168.88.130\va_data$\programdata\vision\templates\plan"
    );

    let config = CatalogConfig::for_image_server("hospImgSrv");
    assert_eq!(config.config_version, 1);
    assert_eq!(config.objective_dir, paths::objective_dir("hospImgSrv"));
}

#[test]
fn save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("catalog.json");

    let mut config = CatalogConfig::for_image_server("hospImgSrv");
    config.plan_dir = "/srv/templates/plan".into();
    config.config_version = 0;
    save_config(&path, &config).unwrap();

    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded.config_version, 1);
    assert_eq!(loaded.plan_dir, "/srv/templates/plan");
    assert_eq!(loaded.image_server, "hospImgSrv");
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn pre_versioned_config_is_migrated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(
        &path,
        r#"{ "image_server": "hospImgSrv", "plan_dir": "/local/plan" }"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.config_version, 1);
    assert_eq!(config.protocol_dir, paths::protocol_dir("hospImgSrv"));
    assert_eq!(config.plan_dir, "/local/plan");
}

#[test]
fn newer_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, r#"{ "config_version": 7, "image_server": "x" }"#).unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::UnsupportedConfigVersion { found: 7, supported: 1 }
    ));
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, CatalogError::Read { .. }));
}
