use probekit_core::{Units, WorkCoordinateSystem};
use probekit_probe::{FieldKey, Mode, ModeSelector, ParameterModel};
use probekit_settings::{PanelConfig, SettingsError, SettingsRecord, SettingsSnapshot, SettingsStore};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_missing_file_loads_nothing() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::new(dir.path().join("probe.toml"));
    assert_eq!(store.load().unwrap(), None);
    assert_eq!(store.load_snapshot().unwrap(), None);
}

#[test]
fn test_save_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::new(dir.path().join("nested").join("probe.toml"));

    let model = ParameterModel::new();
    model.set(FieldKey::XyzYOffset, 1.0 / 3.0).unwrap();
    model.set(FieldKey::SlowMeasureRate, 42.5).unwrap();
    model.set_units(Units::INCH);
    model.set_work_coordinate_system(WorkCoordinateSystem::G55);
    let selector = ModeSelector::new(Mode::Settings);

    let snapshot = SettingsSnapshot::capture(&model, &selector);
    store.save_snapshot(&snapshot).unwrap();

    let loaded = store.load_snapshot().unwrap().unwrap();
    assert_eq!(loaded, snapshot);

    let fresh = ParameterModel::new();
    let (values, mode) = loaded.restore(&fresh.values(), Mode::Xyz).unwrap();
    assert_eq!(values, model.values());
    assert_eq!(mode, Mode::Settings);
}

#[test]
fn test_record_file_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("probe.toml");
    let store = SettingsStore::new(&path);
    store
        .save(&SettingsRecord {
            version: Some("1.0".to_string()),
            json_data: Some(r#"{"zOffset":0.5}"#.to_string()),
        })
        .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("version = \"1.0\""));
    assert!(text.contains("json_data"));
}

#[test]
fn test_old_payload_without_z_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("probe.toml");
    std::fs::write(
        &path,
        "version = \"1.0\"\njson_data = '{\"outsideXDistance\": 15.0, \"selectedTabIdx\": 1}'\n",
    )
    .unwrap();

    let snapshot = SettingsStore::new(&path).load_snapshot().unwrap().unwrap();
    let (values, mode) = snapshot
        .restore(&ParameterModel::new().values(), Mode::Xyz)
        .unwrap();

    assert_eq!(values.get(FieldKey::OutsideXDistance), 15.0);
    assert_eq!(values.get(FieldKey::ZDistance), 10.0);
    assert_eq!(values.get(FieldKey::ZOffset), 10.0);
    assert_eq!(mode, Mode::OutsideCorner);
}

#[test]
fn test_garbage_file_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("probe.toml");
    std::fs::write(&path, "this is = = not toml").unwrap();

    let err = SettingsStore::new(&path).load().unwrap_err();
    assert!(err.is_corrupt());
}

#[test]
fn test_corrupt_restore_leaves_model_untouched() {
    let model = ParameterModel::new();
    model.set(FieldKey::OutsideXDistance, 5.0).unwrap();
    let before = model.values();

    let snapshot =
        SettingsSnapshot::decode(r#"{"outsideXDistance": 50.0, "settingsFastFindRate": 0.0}"#).unwrap();
    let result = snapshot.restore(&model.values(), Mode::Xyz);
    assert!(matches!(result, Err(SettingsError::CorruptSnapshot(_))));

    if let Ok((values, _)) = result {
        model.replace_all(values).unwrap();
    }
    assert_eq!(model.values(), before);
}

#[test]
fn test_panel_config_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = PanelConfig {
        settings_file: Some(PathBuf::from("/var/lib/probekit/probe.toml")),
        autosave_on_close: false,
        disable_controls_when_busy: true,
    };

    for name in ["panel.toml", "panel.json"] {
        let path = dir.path().join(name);
        config.save_to_file(&path).unwrap();
        assert_eq!(PanelConfig::load_from_file(&path).unwrap(), config);
    }
}

#[test]
fn test_invalid_panel_config_is_not_written() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("panel.toml");
    let config = PanelConfig {
        settings_file: Some(PathBuf::new()),
        ..PanelConfig::default()
    };

    assert!(config.save_to_file(&path).is_err());
    assert!(!path.exists());
}
