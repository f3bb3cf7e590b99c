use crate::cli::support::reportdeck;
use predicates::prelude::*;

#[test]
fn test_evaluate_requires_endpoint() {
    reportdeck()
        .arg("evaluate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no run-control endpoint configured"));
}

#[test]
fn test_evaluate_unreachable_service() {
    reportdeck()
        .args(["evaluate", "--no-wait", "--endpoint", "http://127.0.0.1:9"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("run-control service unavailable"));
}

#[test]
fn test_status_rejects_odd_run_ids() {
    reportdeck()
        .env("REPORTDECK_RUN_CONTROL_URL", "http://127.0.0.1:9")
        .args(["status", "../admin"])
        .assert()
        .code(2);
}
