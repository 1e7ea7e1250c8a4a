//! Integration tests for the `sanctl` CLI binary.
//!
//! These validate argument parsing, help output, shell completions, and
//! error handling -- all without requiring a live array.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `sanctl` binary with env isolation.
///
/// Clears all `SANCTL_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn sanctl_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("sanctl");
    cmd.env("HOME", "/tmp/sanctl-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/sanctl-cli-test-nonexistent")
        .env_remove("SANCTL_PROFILE")
        .env_remove("SANCTL_ARRAY")
        .env_remove("SANCTL_USERNAME")
        .env_remove("SANCTL_PASSWORD")
        .env_remove("SANCTL_TIMEOUT");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = sanctl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    sanctl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("replication")
            .and(predicate::str::contains("pair"))
            .and(predicate::str::contains("job"))
            .and(predicate::str::contains("hostgroup")),
    );
}

#[test]
fn test_version_flag() {
    sanctl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sanctl"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    sanctl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    sanctl_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_path() {
    sanctl_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = sanctl_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_pair_status_without_config() {
    // No config file, no --array flag: actionable config error.
    let output = sanctl_cmd()
        .args([
            "pair", "status", "--copy-group", "CG1", "--pair-name", "pair1",
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("Configuration") || text.contains("config"),
        "Expected config guidance in output:\n{text}"
    );
}

#[test]
fn test_job_wait_requires_credentials() {
    // An array URL without credentials must fail with the auth exit code.
    let output = sanctl_cmd()
        .args(["job", "wait", "42", "--array", "https://192.0.2.1"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3), "Expected auth exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("credentials"),
        "Expected credentials guidance in output:\n{text}"
    );
}

#[test]
fn test_pair_create_rejects_unknown_kind() {
    let output = sanctl_cmd()
        .args([
            "pair",
            "create",
            "--copy-group",
            "CG1",
            "--pair-name",
            "pair1",
            "--pvol",
            "100",
            "--svol",
            "200",
            "--kind",
            "TRIANGLE",
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("TRIANGLE"),
        "Expected the bad kind in output:\n{text}"
    );
}
