///
/// # CLI Tests for the handoff binary
///

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn handoff() -> Command {
    Command::new(env!("CARGO_BIN_EXE_handoff"))
}

#[test]
fn test_json_summary() {
    let output = handoff()
        .args(["-n", "3", "--seed", "5", "--unit-ms", "1", "--quiet", "--json"])
        .args(["--discipline", "lock-held"])
        .output()
        .expect("Failed to run handoff");

    assert!(output.status.success());
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(summary["discipline"], "lock-held");
    assert_eq!(summary["seed"], 5);
    assert_eq!(summary["slot"]["puts"], 3);
    assert_eq!(summary["slot"]["takes"], 3);
    assert_eq!(summary["slot"]["occupancy"], 0);
}

#[test]
fn test_progress_stream() {
    let output = handoff()
        .args(["-n", "2", "--seed", "9", "--unit-ms", "1"])
        .output()
        .expect("Failed to run handoff");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("prod(0): start"));
    assert!(stdout.contains("\tprod(1): handed item 1"));
    assert!(stdout.contains("\tcons(1): received item 1"));
    assert!(stdout.contains("Final occupancy = 0"));
}

#[test]
fn test_config_file_and_override() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("handoff.toml");
    fs::write(&path, "iterations = 4\nunit_ms = 1\nseed = 3\n").unwrap();

    let output = handoff()
        .arg("--config")
        .arg(&path)
        .args(["-n", "2", "--quiet", "--json"])
        .output()
        .expect("Failed to run handoff");

    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["iterations"], 2);
    assert_eq!(summary["discipline"], "signaling");
}

#[test]
fn test_invalid_config_exits_with_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("handoff.toml");
    fs::write(&path, "min_delay = 5\nmax_delay = 1\n").unwrap();

    let output = handoff()
        .arg("--config")
        .arg(&path)
        .output()
        .expect("Failed to run handoff");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Invalid config"));
}
