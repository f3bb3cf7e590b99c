use crate::cli::support::{sample_corpus, Corpus};
use predicates::prelude::*;

#[test]
fn test_list_newest_first() {
    let corpus = sample_corpus();
    let output = corpus.cmd().arg("list").assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("run-b/queue-setup.json"));
    assert!(lines[0].contains("Queue Setup"));
    assert!(lines[1].contains("Bucket Policy"));
    assert!(lines[1].contains("[gpt-a]"));
}

#[test]
fn test_list_filters_and_static_names() {
    let corpus = sample_corpus();
    corpus
        .cmd()
        .args(["list", "--run", "run-a", "--static"])
        .assert()
        .success()
        .stdout(predicate::str::contains("run-a/bucket-policy-1700000000123.html"))
        .stdout(predicate::str::contains("queue-setup").not());

    corpus
        .cmd()
        .args(["list", "--model", "gpt-b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("run-b/queue-setup.json"))
        .stdout(predicate::str::contains("bucket-policy").not());
}

#[test]
fn test_list_json() {
    let corpus = sample_corpus();
    let output = corpus
        .cmd()
        .args(["--format", "json", "list"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let reports: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["name"], "run-b/queue-setup.json");
    assert_eq!(reports[0]["run"], "run-b");
    assert_eq!(reports[1]["task_label"], "Bucket policy");
    assert!(reports[1]["size_bytes"].as_u64().unwrap() > 0);
}

#[test]
fn test_list_skips_summary_and_other_files() {
    let corpus = Corpus::new();
    corpus
        .report("r1/a.json", "{}", 5)
        .file("r1/summary.json", "{}")
        .file("r1/notes.txt", "hello")
        .report("r1/deep/nested/b.json", "{ not json", 1);

    let output = corpus
        .cmd()
        .args(["--format", "json", "list"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let reports: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let names: Vec<_> = reports
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["r1/deep/nested/b.json", "r1/a.json"]);
    assert!(reports[0].get("task_label").is_none());
}

#[test]
fn test_list_missing_root_is_empty() {
    let corpus = Corpus::new();
    corpus
        .bare_cmd()
        .args(["--reports", "does-not-exist", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No reports found"));
}
