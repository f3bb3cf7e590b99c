use crate::cli::support::sample_corpus;
use predicates::prelude::*;

const BUCKET: &str = "run-a/bucket-policy-1700000000123.json";

#[test]
fn test_show_text_digest() {
    let corpus = sample_corpus();
    corpus
        .cmd()
        .args(["show", BUCKET])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Bucket policy [easy]"))
        .stdout(predicate::str::contains("Score: 1.00"))
        .stdout(predicate::str::contains("aws s3 mb s3://x"))
        .stdout(predicate::str::contains("-0.04"));
}

#[test]
fn test_show_json_is_raw_report() {
    let corpus = sample_corpus();
    let output = corpus
        .cmd()
        .args(["--format", "json", "show", BUCKET])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let raw: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(raw["metrics"]["error_action_penalty"], 0.04);
}

#[test]
fn test_show_rejects_bad_names() {
    let corpus = sample_corpus();
    corpus
        .cmd()
        .args(["show", "run-a/bucket-policy.txt"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid report name"));

    corpus
        .cmd()
        .args(["show", "../outside.json"])
        .assert()
        .code(2);
}

#[test]
fn test_show_missing_report() {
    let corpus = sample_corpus();
    corpus
        .cmd()
        .args(["--format", "json", "show", "run-a/gone.json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\"error\""));
}

#[test]
fn test_show_malformed_report() {
    let corpus = sample_corpus();
    corpus.file("run-a/broken.json", "{ nope");
    corpus
        .cmd()
        .args(["show", "run-a/broken.json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("failed to parse"));
}
