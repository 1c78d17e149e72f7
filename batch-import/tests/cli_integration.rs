//! Integration tests for the batch-import binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Temp dir whose config path does not exist, so defaults are used
fn setup_test_env() -> (TempDir, String) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    (temp_dir, config_path.to_string_lossy().to_string())
}

fn batch_import(config_path: &str) -> Command {
    let mut cmd = Command::cargo_bin("batch-import").unwrap();
    cmd.env("BATCHCAST_CONFIG", config_path)
        .env_remove("RUST_LOG")
        .env_remove("BATCHCAST_LOG_FORMAT")
        .env_remove("BATCHCAST_LOG_LEVEL");
    cmd
}

#[test]
fn test_help_lists_options() {
    let mut cmd = Command::cargo_bin("batch-import").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--slot"))
        .stdout(predicate::str::contains("--schedule"))
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("EXIT CODES"));
}

#[test]
fn test_import_csv_as_json() {
    let (temp_dir, config_path) = setup_test_env();
    let csv = temp_dir.path().join("posts.csv");
    fs::write(
        &csv,
        "content,platforms,date,time\n\
         \"Hello, world\",\"twitter,linkedin\",2024-12-20,09:00\n\
         Second post,instagram,,\n",
    )
    .unwrap();

    let output = batch_import(&config_path)
        .arg(&csv)
        .args(["--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let drafts: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let drafts = drafts.as_array().unwrap();
    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0]["content"], "Hello, world");
    assert_eq!(drafts[0]["platforms"], serde_json::json!(["twitter", "linkedin"]));
    assert_eq!(drafts[0]["scheduled_date"], "2024-12-20");
    assert_eq!(drafts[1]["status"], "draft");

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Imported 2 posts"));
}

#[test]
fn test_slot_and_schedule() {
    let (temp_dir, config_path) = setup_test_env();
    let csv = temp_dir.path().join("posts.csv");
    fs::write(&csv, "content\nFirst\nSecond\nThird\n").unwrap();

    let output = batch_import(&config_path)
        .arg(&csv)
        .args(["--slot", "Lunch Break", "--schedule", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let drafts: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    for draft in drafts.as_array().unwrap() {
        assert_eq!(draft["status"], "scheduled");
        assert_eq!(draft["scheduled_time"], "12:30");
        assert_eq!(draft["platforms"], serde_json::json!(["twitter", "linkedin"]));
    }
}

#[test]
fn test_failed_file_does_not_stop_others() {
    let (temp_dir, config_path) = setup_test_env();
    let good = temp_dir.path().join("good.csv");
    let bad = temp_dir.path().join("notes.pdf");
    let empty = temp_dir.path().join("empty.csv");
    fs::write(&good, "content,platforms\nHi,threads\n").unwrap();
    fs::write(&bad, "irrelevant").unwrap();
    fs::write(&empty, "content,platforms\n").unwrap();

    batch_import(&config_path)
        .args([&bad, &good, &empty])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Hi"))
        .stderr(predicate::str::contains("Unsupported file type: .pdf"))
        .stderr(predicate::str::contains("No valid data found"))
        .stderr(predicate::str::contains("Imported 1 post"));
}

#[test]
fn test_unknown_slot_is_invalid_input() {
    let (temp_dir, config_path) = setup_test_env();
    let csv = temp_dir.path().join("posts.csv");
    fs::write(&csv, "content\nHello\n").unwrap();

    batch_import(&config_path)
        .arg(&csv)
        .args(["--slot", "midnight"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown time slot: midnight"));
}

#[test]
fn test_no_files_is_invalid_input() {
    let (_temp_dir, config_path) = setup_test_env();

    batch_import(&config_path).assert().code(3);
}

#[test]
fn test_list_slots_from_config() {
    let (_temp_dir, config_path) = setup_test_env();
    fs::write(
        &config_path,
        r#"
[[slots]]
id = "weekend"
name = "Weekend"
time = "10:00"
days = ["Sat", "Sun"]
platforms = ["instagram"]
"#,
    )
    .unwrap();

    batch_import(&config_path)
        .arg("--list-slots")
        .assert()
        .success()
        .stdout(predicate::str::contains("weekend\tWeekend\tSat, Sun 10:00\tinstagram"))
        .stdout(predicate::str::contains("morning-boost").not());
}

#[test]
fn test_bad_config_exits_with_config_code() {
    let (_temp_dir, config_path) = setup_test_env();
    fs::write(&config_path, "[events]\ncapacity = 0\n").unwrap();

    batch_import(&config_path)
        .arg("--list-slots")
        .assert()
        .code(2);
}

#[test]
fn test_unknown_format_rejected_by_parser() {
    let (_temp_dir, config_path) = setup_test_env();

    batch_import(&config_path)
        .args(["--list-slots", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("possible values: text, json"));
}

#[test]
fn test_json_rows_without_platforms_use_default() {
    let (temp_dir, config_path) = setup_test_env();
    let json = temp_dir.path().join("posts.json");
    fs::write(&json, r#"[{"content": "hi"}]"#).unwrap();

    let output = batch_import(&config_path)
        .arg(&json)
        .args(["--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let drafts: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(drafts[0]["platforms"], serde_json::json!(["instagram"]));
}
