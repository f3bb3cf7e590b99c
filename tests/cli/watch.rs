use std::fs;

use crate::cli::support::sample_corpus;
use predicates::prelude::*;

#[test]
fn test_watch_once_writes_dashboard() {
    let corpus = sample_corpus();
    corpus
        .cmd()
        .args(["watch", "--once", "--summary", "--report", "run-a/bucket-policy-1700000000123.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dashboard.html"))
        .stdout(predicate::str::contains("run run-a"));

    let html = fs::read_to_string(corpus.dir.path().join("dashboard.html")).unwrap();
    assert!(html.contains("http-equiv=\"refresh\""));
    assert!(html.contains("<h2>Bucket policy</h2>"));
    assert!(html.contains("Leaderboard"));
    assert!(!html.contains("<script>alert(1)</script>"));
}

#[test]
fn test_watch_missing_selection_falls_back() {
    let corpus = sample_corpus();
    let out = corpus.dir.path().join("live.html");
    corpus
        .cmd()
        .args(["watch", "--once", "--run", "gone", "--report", "gone/x.json", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("run run-b"))
        .stdout(predicate::str::contains("selected report is gone"));
    assert!(fs::read_to_string(out).unwrap().contains("Select a report"));
}
