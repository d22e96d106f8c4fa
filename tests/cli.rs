use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("data").join("commands.db")
}

fn cs(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cs").unwrap();
    cmd.env("CS_DB", db_path(dir))
        .env("HOME", dir.path())
        .env_remove("CS_HISTFILE")
        .env("NO_COLOR", "1")
        .env_remove("HISTTIMEFORMAT")
        .env_remove("RUST_LOG");
    cmd
}

fn write_history(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("history");
    fs::write(&path, content).unwrap();
    path
}

fn list_json(dir: &TempDir) -> serde_json::Value {
    let output = cs(dir).args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    cs(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cs version"));
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    cs(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("days"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn test_save_then_list() {
    let dir = TempDir::new().unwrap();

    cs(&dir)
        .args(["save", "\"make release\"", "build", "artifacts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Command saved: make release"));

    cs(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("make release"))
        .stdout(predicate::str::contains("build artifacts"));

    let listed = list_json(&dir);
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["commands"][0]["command"], "make release");
    assert_eq!(listed["commands"][0]["description"], "build artifacts");
}

#[test]
fn test_legacy_flags() {
    let dir = TempDir::new().unwrap();

    cs(&dir).args(["-y", "pwd"]).assert().success();
    cs(&dir).args(["--no-color", "-y", "hostname"]).assert().success();

    cs(&dir)
        .arg("-l")
        .assert()
        .success()
        .stdout(predicate::str::contains("pwd"))
        .stdout(predicate::str::contains("hostname"))
        .stdout(predicate::str::contains("default"));
}

#[test]
fn test_capture_skips_own_invocation() {
    let dir = TempDir::new().unwrap();
    let history = write_history(&dir, "ls -la\ncs\n");

    cs(&dir)
        .args(["show", "everything"])
        .env("SHELL", "/bin/bash")
        .env("CS_HISTFILE", &history)
        .assert()
        .success()
        .stdout(predicate::str::contains("Command saved: ls -la"));

    let listed = list_json(&dir);
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["commands"][0]["description"], "show everything");
}

#[test]
fn test_capture_with_histtimeformat_set() {
    let dir = TempDir::new().unwrap();
    let history = write_history(&dir, "pwd\nls -la\n");

    cs(&dir)
        .env("SHELL", "/bin/bash")
        .env("CS_HISTFILE", &history)
        .env("HISTTIMEFORMAT", "%F %T ")
        .assert()
        .success()
        .stdout(predicate::str::contains("Command saved: ls -la"));

    assert_eq!(fs::read_to_string(&history).unwrap(), "pwd\nls -la\n");
}

#[test]
fn test_capture_unsupported_shell() {
    let dir = TempDir::new().unwrap();

    cs(&dir)
        .env("SHELL", "/usr/bin/fish")
        .assert()
        .failure()
        .code(6)
        .stderr(predicate::str::contains("Unsupported shell"))
        .stderr(predicate::str::contains("cs save"));
}

#[test]
fn test_capture_nothing_valid() {
    let dir = TempDir::new().unwrap();
    let history = write_history(&dir, "foobarnonexistentcmd --flag\n");

    cs(&dir)
        .env("SHELL", "/bin/bash")
        .env("CS_HISTFILE", &history)
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("No valid command"));
}

#[test]
fn test_capture_missing_history_file() {
    let dir = TempDir::new().unwrap();

    cs(&dir)
        .env("SHELL", "/bin/zsh")
        .env("CS_HISTFILE", dir.path().join("missing_history"))
        .assert()
        .failure()
        .code(6)
        .stderr(predicate::str::contains("History file not found"));
}

#[test]
fn test_delete_invalid_id_does_not_touch_store() {
    let dir = TempDir::new().unwrap();

    cs(&dir)
        .args(["delete", "abc"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("positive integer"));

    assert!(!db_path(&dir).exists());
}

#[test]
fn test_delete_lifecycle() {
    let dir = TempDir::new().unwrap();

    cs(&dir).args(["save", "uptime"]).assert().success();
    let id = list_json(&dir)["commands"][0]["id"].as_i64().unwrap();

    cs(&dir)
        .args(["delete", "999"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("No record with ID 999"));
    assert_eq!(list_json(&dir)["count"], 1);

    cs(&dir)
        .args(["rm", &id.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Deleted command {id} (1 row removed)")));
    assert_eq!(list_json(&dir)["count"], 0);
}

#[test]
fn test_days_always_has_seven_buckets() {
    let dir = TempDir::new().unwrap();

    let output = cs(&dir).args(["days", "--json"]).output().unwrap();
    assert!(output.status.success());
    let days: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(days["days"].as_array().unwrap().len(), 7);
    assert_eq!(days["count"], 0);

    cs(&dir)
        .arg("days")
        .assert()
        .success()
        .stdout(predicate::str::contains("(no records)"));
}

#[test]
fn test_export_then_import() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let backup = source.path().join("backup.json");

    cs(&source).args(["save", "git fetch"]).assert().success();
    cs(&source).args(["save", "cargo test", "run", "tests"]).assert().success();

    cs(&source)
        .arg("export")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 commands"));

    let content = fs::read_to_string(&backup).unwrap();
    assert!(content.contains("\n    {\n        \"id\""));

    cs(&target)
        .arg("import")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("2/2 records imported"));

    let listed = list_json(&target);
    assert_eq!(listed["count"], 2);
}

#[test]
fn test_export_default_name_in_data_dir() {
    let dir = TempDir::new().unwrap();

    cs(&dir).args(["save", "date"]).assert().success();
    cs(&dir).arg("o").assert().success();

    let backups: Vec<_> = fs::read_dir(dir.path().join("data"))
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("bak"))
        .collect();
    assert_eq!(backups.len(), 1);
}

#[test]
fn test_import_reports_partial_success() {
    let dir = TempDir::new().unwrap();
    let backup = dir.path().join("partial.json");
    fs::write(
        &backup,
        r#"[
    {"id": 1, "command": "ls", "description": "default", "created_at": "2024-01-01T10:00:00"},
    {"id": 2, "command": "  ", "description": "blank", "created_at": "2024-01-02T10:00:00"},
    {"id": 3, "command": "pwd", "created_at": "2024-01-03T10:00:00+00:00"}
]"#,
    )
    .unwrap();

    cs(&dir)
        .arg("import")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("2/3 records imported"));

    assert_eq!(list_json(&dir)["count"], 2);
}

#[test]
fn test_import_empty_file_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let backup = dir.path().join("empty.json");
    fs::write(&backup, "[]").unwrap();

    cs(&dir)
        .arg("import")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("No command records found"));
}

#[test]
fn test_import_requires_path() {
    let dir = TempDir::new().unwrap();

    cs(&dir)
        .arg("-i")
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("cs import <backup file>"));
}

#[test]
fn test_import_malformed_file() {
    let dir = TempDir::new().unwrap();
    let backup = dir.path().join("broken.json");
    fs::write(&backup, "{ nope").unwrap();

    cs(&dir).arg("import").arg(&backup).assert().failure().code(8);
}

#[test]
fn test_reset_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    cs(&dir).args(["save", "whoami"]).assert().success();

    cs(&dir)
        .arg("reset")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));
    assert!(db_path(&dir).exists());

    cs(&dir)
        .arg("-c")
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Database cleared"));
    assert!(!db_path(&dir).exists());

    // The store is recreated empty on next use
    assert_eq!(list_json(&dir)["count"], 0);
}

#[test]
fn test_reset_missing_database() {
    let dir = TempDir::new().unwrap();

    cs(&dir)
        .args(["reset", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("does not exist"));
}

#[test]
fn test_dry_run_save_writes_nothing() {
    let dir = TempDir::new().unwrap();

    cs(&dir)
        .args(["--dry-run", "save", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would save: ls"));

    assert!(!db_path(&dir).exists());
}
