//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against an isolated data directory and
//! verify outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    run_cli_with_input(data_dir, args, "")
}

fn run_cli_with_input(data_dir: &Path, args: &[&str], input: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tokenearner-cli"))
        .args(args)
        .env("TOKENEARNER_DATA_DIR", data_dir)
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("each line is a JSON event"))
        .collect()
}

#[test]
fn test_status_on_fresh_install() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(dir.path(), &["ledger", "status"]);
    assert_eq!(code, 0, "ledger status failed: {stderr}");

    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["type"], "StateSnapshot");
    assert_eq!(snapshot["phase"], "idle");
    assert_eq!(snapshot["balance"], 0);
    assert_eq!(snapshot["daily_remaining"], 1000);

    // First launch persists the reset date.
    let saved = std::fs::read_to_string(dir.path().join("tokenEarnerData.json")).unwrap();
    assert!(saved.contains("lastResetDate"));
}

#[test]
fn test_status_reads_existing_ledger_and_rolls_day() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("tokenEarnerData.json"),
        r#"{"tokenCount":300,"earningsHistory":[
            {"amount":100,"timestamp":1760000000000},
            {"amount":100,"timestamp":1760000060000},
            {"amount":100,"timestamp":1760000120000}],
           "sessionCount":3,"dailyEarnings":300,"dailyTarget":1000,
           "lastResetDate":"Thu Jan 01 1970"}"#,
    )
    .unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["ledger", "status"]);
    assert_eq!(code, 0);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["balance"], 300);
    assert_eq!(snapshot["daily_earned"], 0);
    assert_eq!(snapshot["session_count"], 0);

    let (stdout, _, code) = run_cli(dir.path(), &["ledger", "history"]);
    assert_eq!(code, 0);
    let rows: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["amount"], 100);
    assert!(rows[0]["timestamp"].as_str().unwrap() > rows[2]["timestamp"].as_str().unwrap());
}

#[test]
fn test_malformed_ledger_recovers() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tokenEarnerData.json"), "{oops").unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["ledger", "status"]);
    assert_eq!(code, 0);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["balance"], 0);
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "storage.backend", "sqlite"]);
    assert_eq!(code, 0);
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "storage.backend"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "sqlite");

    let (_, _, code) = run_cli(dir.path(), &["ledger", "status"]);
    assert_eq!(code, 0);
    assert!(dir.path().join("tokenearner.db").exists());
}

#[test]
fn test_config_paths_follow_backend() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "paths"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("tokenEarnerData.json"));

    run_cli(dir.path(), &["config", "set", "storage.backend", "sqlite"]);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "paths"]);
    assert!(stdout.contains("tokenearner.db"));
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "nope.nothing"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown config key: nope.nothing"));

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "host.open_links", "maybe"]);
    assert_ne!(code, 0);
}

#[test]
fn test_session_rejects_early_claim() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli_with_input(
        dir.path(),
        &["timer", "session", "--no-open"],
        "claim\nstatus\nquit\n",
    );
    assert_eq!(code, 0);

    let events = json_lines(&stdout);
    assert!(events
        .iter()
        .any(|e| e["type"] == "Toast" && e["message"] == "Nothing to claim yet"));
    assert!(events
        .iter()
        .any(|e| e["type"] == "StateSnapshot" && e["phase"] == "idle"));
}

#[test]
fn test_session_earn_starts_countdown() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli_with_input(
        dir.path(),
        &["timer", "session", "--no-open"],
        "earn\nearn\nstatus\nquit\n",
    );
    assert_eq!(code, 0);

    let events = json_lines(&stdout);
    let started = events.iter().filter(|e| e["type"] == "TimerStarted").count();
    assert_eq!(started, 1);
    assert!(events.iter().any(|e| e["type"] == "Toast"
        && e["message"] == "Please wait for the current task to complete"));
    assert!(events
        .iter()
        .any(|e| e["type"] == "StateSnapshot" && e["phase"] == "running"));
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("tokenearner-cli"));
}
