use std::fs;

use crate::cli::support::{sample_corpus, Corpus};
use predicates::prelude::*;

#[test]
fn test_bundle_directory_prints_written_paths() {
    let corpus = sample_corpus();
    let out = corpus.dir.path().join("site");
    corpus
        .cmd()
        .arg("bundle")
        .arg(corpus.root())
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("bucket-policy-1700000000123.html"))
        .stdout(predicate::str::contains("queue-setup.html"))
        .stdout(predicate::str::contains("index.html"));

    let page = fs::read_to_string(out.join("run-a/bucket-policy-1700000000123.html")).unwrap();
    assert!(!page.contains("<script>alert(1)</script>"));
    assert!(page.contains("&lt;script&gt;"));
    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.contains("gpt-a"));
}

#[test]
fn test_bundle_defaults_to_configured_dir() {
    let corpus = sample_corpus();
    corpus
        .cmd()
        .arg("bundle")
        .arg(corpus.root())
        .assert()
        .success();
    assert!(corpus.dir.path().join("site/index.html").exists());
}

#[test]
fn test_bundle_single_file() {
    let corpus = sample_corpus();
    let out = corpus.dir.path().join("one.html");
    corpus
        .cmd()
        .arg("bundle")
        .arg(corpus.root().join("run-b/queue-setup.json"))
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("one.html"));
    let html = fs::read_to_string(out).unwrap();
    assert!(html.contains(r#"id="report-data""#));
}

#[test]
fn test_bundle_missing_input() {
    let corpus = Corpus::new();
    corpus
        .cmd()
        .args(["bundle", "nowhere"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_bundle_reports_each_failed_file() {
    let corpus = sample_corpus();
    corpus.file("run-b/broken.json", "{ nope");
    let out = corpus.dir.path().join("site");
    corpus
        .cmd()
        .arg("bundle")
        .arg(corpus.root())
        .arg("-o")
        .arg(&out)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("index.html"))
        .stderr(predicate::str::contains("broken.json"));
    assert!(out.join("run-b/queue-setup.html").exists());
}
