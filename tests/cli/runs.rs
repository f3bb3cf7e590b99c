use crate::cli::support::sample_corpus;
use predicates::prelude::*;

#[test]
fn test_runs_most_recent_first() {
    let corpus = sample_corpus();
    let output = corpus.cmd().arg("runs").assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    let run_b = stdout.find("run-b").unwrap();
    let run_a = stdout.find("run-a").unwrap();
    assert!(run_b < run_a);
    assert!(stdout.contains("Models: gpt-a, gpt-b"));
}

#[test]
fn test_runs_json() {
    let corpus = sample_corpus();
    corpus
        .cmd()
        .args(["--format", "json", "runs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 1"))
        .stdout(predicate::str::contains("\"models\""));
}
