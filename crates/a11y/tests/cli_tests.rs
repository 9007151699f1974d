//! Integration tests for the `a11y` binary: output modes and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn a11y(temp: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("a11y"));
    cmd.current_dir(temp.path()).env_remove("A11Y_DATA_DIR");
    cmd
}

fn setup() -> TempDir {
    let temp = TempDir::new().unwrap();
    a11y(&temp).arg("init").assert().success();
    temp
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_init_creates_data_directory() {
    let temp = TempDir::new().unwrap();
    a11y(&temp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(temp.path().join(".a11y/issues.json").exists());
    assert!(temp.path().join(".a11y/current_project").exists());
}

#[test]
fn test_data_dir_env_override() {
    let temp = TempDir::new().unwrap();
    a11y(&temp)
        .env("A11Y_DATA_DIR", "tracker-data")
        .arg("init")
        .assert()
        .success();

    assert!(temp.path().join("tracker-data/projects.json").exists());
}

#[test]
fn test_issue_list_json_envelope() {
    let temp = setup();
    let value = json_stdout(a11y(&temp).args([
        "issue", "list", "--all", "--sort", "severity", "--order", "desc", "--json",
    ]));

    assert_eq!(value["success"], true);
    assert_eq!(value["metadata"]["command"], "issue list");
    assert_eq!(value["data"]["count"], 12);
    assert_eq!(value["data"]["issues"][0]["severity"], "critical");
}

#[test]
fn test_issue_list_defaults_to_selected_project() {
    let temp = setup();
    a11y(&temp).args(["project", "select", "2"]).assert().success();

    let value = json_stdout(a11y(&temp).args(["issue", "list", "--json"]));
    let issues = value["data"]["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 3);
    assert!(issues.iter().all(|i| i["projectId"] == "2"));
}

#[test]
fn test_issue_show_missing_exits_not_found() {
    let temp = setup();
    a11y(&temp)
        .args(["issue", "show", "does-not-exist"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Issue not found: does-not-exist"));
}

#[test]
fn test_issue_show_missing_json_error() {
    let temp = setup();
    let output = a11y(&temp)
        .args(["issue", "show", "does-not-exist", "--json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], false);
    assert_eq!(value["error"]["code"], "ISSUE_NOT_FOUND");
}

#[test]
fn test_issue_add_missing_fields_exits_validation_failed() {
    let temp = setup();
    a11y(&temp)
        .args(["issue", "add", "--title", "Only a title"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains(
            "Missing required fields: description, type, location",
        ));

    let value = json_stdout(a11y(&temp).args(["stats", "--all", "--json"]));
    assert_eq!(value["data"]["total"], 12);
}

#[test]
fn test_issue_add_then_status_change() {
    let temp = setup();
    let added = json_stdout(a11y(&temp).args([
        "issue",
        "add",
        "--title",
        "Video lacks captions",
        "--description",
        "Promo video has no captions",
        "--type",
        "Media",
        "--location",
        "/about",
        "--severity",
        "high",
        "--json",
    ]));
    let id = added["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(added["data"]["projectId"], "1");
    assert_eq!(added["data"]["status"], "new");

    a11y(&temp)
        .args(["issue", "status", &id, "in-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("in-progress"));

    let shown = json_stdout(a11y(&temp).args(["issue", "show", &id, "--json"]));
    assert_eq!(shown["data"]["status"], "in-progress");
}

#[test]
fn test_invalid_severity_is_invalid_argument() {
    let temp = setup();
    a11y(&temp)
        .args(["issue", "list", "--severity", "urgent"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid severity"));
}

#[test]
fn test_search_command() {
    let temp = setup();
    let value = json_stdout(a11y(&temp).args(["search", "contrast", "--json"]));

    let results = value["data"]["results"].as_array().unwrap();
    assert!(!results.is_empty());
    assert!(results.len() <= 5);
    assert_eq!(results[0]["score"], 1.0);
}

#[test]
fn test_stats_counts_projects() {
    let temp = setup();
    let value = json_stdout(a11y(&temp).args(["stats", "--json"]));

    assert_eq!(value["data"]["total"], 5);
    assert_eq!(value["data"]["projectsScanned"], 4);
}

#[test]
fn test_export_csv_to_stdout() {
    let temp = setup();
    a11y(&temp)
        .args(["export", "--all", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Title,Severity,Type,Status,Location,Project,Last Detected,WCAG Guideline",
        ));
}

#[test]
fn test_export_json_writes_file() {
    let temp = setup();
    let value = json_stdout(a11y(&temp).args([
        "export",
        "--format",
        "json",
        "--all",
        "--output-dir",
        "reports",
        "--json",
    ]));

    let filename = value["data"]["filename"].as_str().unwrap();
    assert!(filename.starts_with("accessibility-issues-all-projects-"));
    assert!(filename.ends_with(".json"));

    let content = std::fs::read_to_string(temp.path().join("reports").join(filename)).unwrap();
    let export: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(export["totalIssues"], 12);
}

#[test]
fn test_prefs_set_changes_default_listing() {
    let temp = setup();
    a11y(&temp)
        .args(["prefs", "set", "--severity", "critical", "--show-all-projects", "true"])
        .assert()
        .success();

    let value = json_stdout(a11y(&temp).args(["issue", "list", "--json"]));
    assert_eq!(value["data"]["count"], 2);

    // An explicit flag overrides the saved filter for one invocation
    let value = json_stdout(a11y(&temp).args(["issue", "list", "--severity", "all", "--json"]));
    assert_eq!(value["data"]["count"], 12);
}

#[test]
fn test_unknown_project_select_exits_not_found() {
    let temp = setup();
    a11y(&temp)
        .args(["project", "select", "nope"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Project not found: nope"));
}

#[test]
fn test_quiet_suppresses_confirmation() {
    let temp = setup();
    a11y(&temp)
        .args(["--quiet", "project", "select", "3"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_corrupt_storage_still_lists_seed() {
    let temp = setup();
    std::fs::write(temp.path().join(".a11y/issues.json"), "garbage").unwrap();

    let value = json_stdout(a11y(&temp).args(["issue", "list", "--all", "--json"]));
    assert_eq!(value["data"]["count"], 12);
}

#[test]
fn test_issue_list_type_filter() {
    let temp = setup();
    let value = json_stdout(a11y(&temp).args(["issue", "list", "--all", "--type", "Forms", "--json"]));

    let issues = value["data"]["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 2);
    assert!(issues.iter().all(|i| i["type"] == "Forms"));
}

fn add_critical_issue(temp: &TempDir) -> String {
    let added = json_stdout(a11y(temp).args([
        "issue",
        "add",
        "--title",
        "Keyboard trap in checkout",
        "--description",
        "Focus cannot leave the payment iframe",
        "--type",
        "Keyboard",
        "--location",
        "/checkout",
        "--severity",
        "critical",
        "--json",
    ]));
    added["data"]["id"].as_str().unwrap().to_string()
}

#[test]
fn test_notifications_read_and_clear() {
    let temp = setup();
    let id = add_critical_issue(&temp);
    let note_id = format!("critical-{}", id);

    let value = json_stdout(a11y(&temp).args(["notifications", "--json"]));
    assert_eq!(value["data"]["count"], 1);
    assert_eq!(value["data"]["unread"], 1);
    assert_eq!(value["data"]["notifications"][0]["id"], note_id.as_str());

    a11y(&temp)
        .args(["notifications", "read", &note_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked"));

    let value = json_stdout(a11y(&temp).args(["notifications", "list", "--json"]));
    assert_eq!(value["data"]["unread"], 0);
    assert_eq!(value["data"]["notifications"][0]["read"], true);

    let value = json_stdout(a11y(&temp).args(["notifications", "clear", "--json"]));
    assert_eq!(value["data"]["cleared"], 1);

    let value = json_stdout(a11y(&temp).args(["notifications", "--json"]));
    assert_eq!(value["data"]["count"], 0);
}

#[test]
fn test_notification_read_unknown_exits_not_found() {
    let temp = setup();
    let output = a11y(&temp)
        .args(["notifications", "read", "critical-nope", "--json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["error"]["code"], "NOTIFICATION_NOT_FOUND");
}

#[test]
fn test_report_compliance_score() {
    let temp = setup();
    let value = json_stdout(a11y(&temp).args(["report", "--all", "--json"]));

    let metrics = &value["data"]["report"]["metrics"];
    assert_eq!(metrics["totalIssues"], 12);
    assert_eq!(metrics["resolvedIssues"], 2);
    assert_eq!(metrics["complianceScore"], 17);
    assert_eq!(value["data"]["report"]["project"], "All Projects");
    assert!(value["data"]["path"].is_null());
}

#[test]
fn test_report_save_writes_file() {
    let temp = setup();
    let value = json_stdout(a11y(&temp).args([
        "report",
        "--project",
        "2",
        "--period",
        "90d",
        "--output-dir",
        "reports",
        "--json",
    ]));

    let path = value["data"]["path"].as_str().unwrap();
    let content = std::fs::read_to_string(temp.path().join(path)).unwrap();
    let report: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(report["project"], "Corporate Blog");
    assert_eq!(report["period"], "90d");
    assert!(temp.path().join("reports").is_dir());
}

#[test]
fn test_report_invalid_period_is_invalid_argument() {
    let temp = setup();
    a11y(&temp)
        .args(["report", "--period", "2w"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid report period"));
}
