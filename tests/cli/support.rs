use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use tempfile::{tempdir, TempDir};

/// Get a Command for reportdeck, isolated from the user's config and env
pub fn reportdeck() -> Command {
    let mut cmd = cargo_bin_cmd!("reportdeck");
    cmd.env("REPORTDECK_CONFIG_DIR", "/nonexistent/reportdeck-tests")
        .env_remove("REPORTDECK_REPORT_DIR")
        .env_remove("REPORTDECK_RUN_CONTROL_URL")
        .env_remove("REPORTDECK_LOG")
        .env_remove("REPORTDECK_DEBUG")
        .env_remove("RUST_LOG");
    cmd
}

/// A temporary report corpus under `<tmp>/reports`
pub struct Corpus {
    pub dir: TempDir,
}

impl Corpus {
    pub fn new() -> Self {
        let corpus = Self {
            dir: tempdir().unwrap(),
        };
        fs::create_dir_all(corpus.root()).unwrap();
        corpus
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("reports")
    }

    /// Write a report and backdate its modification time by `age_secs`
    pub fn report(&self, name: &str, body: &str, age_secs: u64) -> &Self {
        let path = self.root().join(name);
        write(&path, body);
        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
        self
    }

    pub fn file(&self, name: &str, body: &str) -> &Self {
        write(&self.root().join(name), body);
        self
    }

    /// reportdeck with `--reports` pointing at this corpus
    pub fn cmd(&self) -> Command {
        let mut cmd = reportdeck();
        cmd.current_dir(self.dir.path()).arg("--reports").arg(self.root());
        cmd
    }

    /// reportdeck run from this corpus's temp dir without a default `--reports`
    pub fn bare_cmd(&self) -> Command {
        let mut cmd = reportdeck();
        cmd.current_dir(self.dir.path());
        cmd
    }
}

fn write(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

/// Two runs with one report each plus a corpus summary
pub fn sample_corpus() -> Corpus {
    let corpus = Corpus::new();
    corpus
        .report(
            "run-a/bucket-policy-1700000000123.json",
            r#"{"task_name": "Bucket policy", "model": "gpt-a", "difficulty": "Easy",
                "metrics": {"score": 1, "error_action_penalty": 0.04},
                "actions": [{"action": "create_bucket", "status": "success",
                             "metadata": {"result": {"invoked_command": "aws s3 mb s3://x",
                                                     "stdout": "<script>alert(1)</script>"}}}]}"#,
            60,
        )
        .report(
            "run-b/queue-setup.json",
            r#"{"task_id": "queue-setup", "model": "gpt-b"}"#,
            10,
        )
        .file(
            "summary.json",
            r#"{"total_reports": 2, "passed": 1, "failed": 1,
                "by_model": {"gpt-a": {"count": 1, "passed": 1, "failed": 0, "avg_score": 1.0, "pass_rate": 1.0}}}"#,
        );
    corpus
}
