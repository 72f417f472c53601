//! Command-line tests for the `modsource` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// The binary, isolated from any config file in the caller's environment.
fn modsource(cwd: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("modsource").unwrap();
    cmd.current_dir(cwd.path())
        .env_remove("MODSOURCE_CONFIG")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", cwd.path())
        .env("HOME", cwd.path());
    cmd
}

#[test]
fn test_scan_text_report() {
    let cwd = TempDir::new().unwrap();
    modsource(&cwd)
        .args(["scan", "--no-color", "--stats"])
        .arg(fixtures_path().join("inventory"))
        .assert()
        .success()
        .stdout(predicate::str::contains("ModSource Inventory"))
        .stdout(predicate::str::contains("widgets.git"))
        .stdout(predicate::str::contains("Number of Files: 4. Number of Modules 7"));
}

#[test]
fn test_scan_json_to_file() {
    let cwd = TempDir::new().unwrap();
    let output = cwd.path().join("inventory.json");

    modsource(&cwd)
        .args(["scan", "--format", "json", "--extra-skip", "vendor", "--output"])
        .arg(&output)
        .arg(fixtures_path().join("inventory"))
        .assert()
        .success();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(parsed["summary"]["files_scanned"], 3);
    assert_eq!(parsed["summary"]["total_modules"], 6);
}

#[test]
fn test_broken_file_fails_the_run() {
    let cwd = TempDir::new().unwrap();
    modsource(&cwd)
        .arg("scan")
        .arg(fixtures_path().join("broken"))
        .assert()
        .code(17)
        .stderr(predicate::str::contains("not a valid uri###"));
}

#[test]
fn test_continue_on_error_exits_with_two() {
    let cwd = TempDir::new().unwrap();
    modsource(&cwd)
        .args(["scan", "--no-color", "--continue-on-error"])
        .arg(fixtures_path().join("broken"))
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Failures"))
        .stdout(predicate::str::contains("good"));
}

#[test]
fn test_missing_directory() {
    let cwd = TempDir::new().unwrap();
    modsource(&cwd)
        .args(["scan", "does-not-exist"])
        .assert()
        .code(15)
        .stderr(predicate::str::contains("Directory not found"));
}

#[test]
fn test_config_file_in_working_directory_is_used() {
    let cwd = TempDir::new().unwrap();
    std::fs::write(cwd.path().join("modsource.yaml"), "scan:\n  continue_on_error: true\n").unwrap();

    modsource(&cwd)
        .args(["scan", "--format", "json"])
        .arg(fixtures_path().join("broken"))
        .assert()
        .code(2);
}

#[test]
fn test_init_then_validate() {
    let cwd = TempDir::new().unwrap();

    modsource(&cwd)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created example configuration"));
    assert!(cwd.path().join("modsource.yaml").exists());

    modsource(&cwd)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));

    // a second init refuses to overwrite
    modsource(&cwd).arg("init").assert().failure();
}

#[test]
fn test_validate_rejects_bad_values() {
    let cwd = TempDir::new().unwrap();
    std::fs::write(cwd.path().join("bad.yaml"), "scan:\n  max_depth: 0\n").unwrap();

    modsource(&cwd)
        .args(["validate", "bad.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("scan.max_depth"));
}
