use super::*;

#[test]
fn test_write_default_if_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join(SETTINGS_FILE);

    write_default_if_missing(&path).unwrap();
    assert!(path.exists());
    assert_eq!(load_settings_from(&path).unwrap(), SearchSettings::default());
}

#[test]
fn test_existing_file_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE);
    std::fs::write(&path, r#"{ "case_sensitive": true }"#).unwrap();

    write_default_if_missing(&path).unwrap();
    assert!(load_settings_from(&path).unwrap().case_sensitive);
}

#[test]
fn test_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE);
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        load_settings_from(&path),
        Err(SettingsError::Json(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_settings_from(&dir.path().join("absent.json")),
        Err(SettingsError::Io(_))
    ));
}

#[test]
fn test_settings_path_file_name() {
    if let Some(path) = get_settings_path() {
        assert!(path.ends_with("helpsearch/settings.json"));
    }
}
