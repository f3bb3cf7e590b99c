use crate::cli::support::{sample_corpus, Corpus};
use predicates::prelude::*;

#[test]
fn test_summary_leaderboard() {
    let corpus = sample_corpus();
    corpus
        .cmd()
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 reports, 1 passed, 1 failed"))
        .stdout(predicate::str::contains("gpt-a  runs=1 passed=1 failed=0 avg=1.00 pass_rate=100.0%"));
}

#[test]
fn test_summary_absent_is_visible() {
    let corpus = Corpus::new();
    corpus
        .cmd()
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary unavailable"));
}

#[test]
fn test_run_scoped_summary() {
    let corpus = sample_corpus();
    corpus.file("run-a/summary.json", r#"{"total_reports": 1}"#);
    corpus
        .cmd()
        .args(["--format", "json", "summary", "--run", "run-a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_reports\": 1"));
}

#[test]
fn test_run_scoped_summary_cannot_escape_root() {
    let corpus = sample_corpus();
    corpus
        .cmd()
        .args(["summary", "--run", "nope/../escape"])
        .assert()
        .code(2);
}
