//! Tests for loading persisted state: corrupt or missing records fall back
//! to seed data and defaults instead of failing.

use a11y::commands::CommandExecutor;
use a11y::seed;
use a11y::state::AppState;
use a11y::storage::{JsonFileStorage, StateStore};
use a11y::SortKey;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, JsonFileStorage) {
    let temp = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(temp.path().join(".a11y"));
    storage.init().unwrap();
    (temp, storage)
}

#[test]
fn test_missing_directory_loads_seed() {
    let temp = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(temp.path().join("never-created"));

    let state = AppState::load(&storage);
    assert_eq!(state.issues, seed::seed_issues());
    assert_eq!(state.projects, seed::seed_projects());
}

#[test]
fn test_corrupt_issues_file_falls_back_to_seed() {
    let (_temp, storage) = setup();
    fs::write(storage.root().join("issues.json"), "[{\"id\": 1").unwrap();

    let state = AppState::load(&storage);
    assert_eq!(state.issues, seed::seed_issues());
}

#[test]
fn test_invalid_enum_value_falls_back_to_seed() {
    let (_temp, storage) = setup();
    let mut value = serde_json::to_value(seed::seed_issues()).unwrap();
    value[0]["severity"] = serde_json::json!("urgent");
    fs::write(storage.root().join("issues.json"), value.to_string()).unwrap();

    let state = AppState::load(&storage);
    assert_eq!(state.issues, seed::seed_issues());
}

#[test]
fn test_unparseable_timestamp_falls_back_to_seed() {
    let (_temp, storage) = setup();
    let mut value = serde_json::to_value(seed::seed_issues()).unwrap();
    value[3]["lastDetected"] = serde_json::json!("yesterday");
    fs::write(storage.root().join("issues.json"), value.to_string()).unwrap();

    let state = AppState::load(&storage);
    assert_eq!(state.issues, seed::seed_issues());
}

#[test]
fn test_one_corrupt_record_does_not_discard_others() {
    let (_temp, storage) = setup();
    let mut issues = seed::seed_issues();
    issues.truncate(3);
    storage.save_issues(&issues).unwrap();
    fs::write(storage.root().join("projects.json"), "not json").unwrap();
    fs::write(storage.root().join("preferences.json"), "{").unwrap();

    let state = AppState::load(&storage);
    assert_eq!(state.issues.len(), 3);
    assert_eq!(state.projects, seed::seed_projects());
    assert_eq!(state.preferences.sort_by, SortKey::LastDetected);
}

#[test]
fn test_corrupt_notification_state_resets() {
    let (_temp, storage) = setup();
    fs::write(storage.root().join("notifications.json"), "[1, 2").unwrap();

    let state = AppState::load(&storage);
    assert!(state.notifications.read.is_empty());
    assert!(state.notifications.dismissed.is_empty());
    assert_eq!(state.issues, seed::seed_issues());
}

#[test]
fn test_out_of_range_notification_window_is_an_error() {
    let (_temp, storage) = setup();
    fs::write(
        storage.root().join("config.toml"),
        "[notifications]\nrecent_window_minutes = 9223372036854775807\n",
    )
    .unwrap();

    let err = CommandExecutor::new(storage).err().unwrap();
    assert!(format!("{:#}", err).contains("recent_window_minutes"));
}

#[test]
fn test_blank_selection_file_selects_first_project() {
    let (_temp, storage) = setup();
    fs::write(storage.root().join("current_project"), "  \n").unwrap();

    let state = AppState::load(&storage);
    assert_eq!(state.selected_project.as_deref(), Some("1"));
}

#[test]
fn test_malformed_config_is_an_error() {
    let (_temp, storage) = setup();
    fs::write(storage.root().join("config.toml"), "[search\n").unwrap();

    assert!(CommandExecutor::new(storage).is_err());
}

#[test]
fn test_init_writes_every_record() {
    let (_temp, storage) = setup();
    let executor = CommandExecutor::new(storage.clone()).unwrap();
    executor.init().unwrap();

    for file in [
        "issues.json",
        "projects.json",
        "current_project",
        "preferences.json",
        "notifications.json",
    ] {
        assert!(storage.root().join(file).exists(), "{} missing", file);
    }
    assert_eq!(storage.load_issues().unwrap(), Some(seed::seed_issues()));
}
