//! Integration tests for the reportdeck CLI
//!
//! These tests run the reportdeck binary against on-disk corpora.

mod cli;

use cli::support::reportdeck;
use predicates::prelude::*;

#[test]
fn test_help_flag() {
    reportdeck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: reportdeck"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("bundle"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn test_version_flag() {
    reportdeck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("reportdeck "));
}

#[test]
fn test_no_command_prints_banner() {
    reportdeck()
        .assert()
        .success()
        .stdout(predicate::str::contains("reportdeck --help"));
}

#[test]
fn test_unknown_flag_json_envelope() {
    reportdeck()
        .args(["--format", "json", "list", "--bogus"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"error\""));
}

#[test]
fn test_unknown_subcommand_json_envelope_with_equals_form() {
    reportdeck()
        .args(["--format=json", "frobnicate"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"usage_error\""));
}

#[test]
fn test_unknown_flag_human_error() {
    reportdeck()
        .args(["list", "--bogus"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"error\"").not());
}
