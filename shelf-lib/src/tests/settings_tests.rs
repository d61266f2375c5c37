use super::*;

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load_from(&dir.path().join("settings.toml"));
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.write_queue_capacity, DEFAULT_WRITE_QUEUE_CAPACITY);
}

#[test]
fn malformed_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "write_queue_capacity = \"lots\"").unwrap();
    assert_eq!(Settings::load_from(&path), Settings::default());
}

#[test]
fn partial_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "write_queue_capacity = 8\n").unwrap();
    let settings = Settings::load_from(&path);
    assert_eq!(settings.write_queue_capacity, 8);
    assert_eq!(settings.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
}

#[test]
fn save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.toml");
    let settings = Settings {
        database_path: dir.path().join("lib.db"),
        default_exe_dir: Some(dir.path().join("games")),
        display_tab: Some(4),
        ..Settings::default()
    };
    settings.save_to(&path).unwrap();

    assert!(!path.with_extension("toml.tmp").exists());
    assert_eq!(Settings::load_from(&path), settings);
}

#[test]
fn database_override() {
    let settings = Settings::default().with_database_path(Some(PathBuf::from("/tmp/x.db")));
    assert_eq!(settings.database_path, PathBuf::from("/tmp/x.db"));
    let settings = Settings::default().with_database_path(None);
    assert_eq!(settings.database_path, Settings::default().database_path);
}

#[test]
fn display_tab_defaults_to_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "display_tab = 3\n").unwrap();
    assert_eq!(Settings::load_from(&path).display_tab, Some(3));
    std::fs::write(&path, "write_queue_capacity = 8\n").unwrap();
    assert_eq!(Settings::load_from(&path).display_tab, None);
}
