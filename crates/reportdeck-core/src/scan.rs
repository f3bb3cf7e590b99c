//! Recursive corpus scan
//!
//! Walks the report root depth-first and produces one [`ReportRecord`] per
//! eligible `*.json` file. The harness may be writing while we scan, so each
//! entry is classified explicitly:
//!
//! | situation                                   | outcome   |
//! |---------------------------------------------|-----------|
//! | entry vanished before read or stat          | `Skipped` |
//! | read/parse failure while extracting a label | `Record` without a label |
//! | stat failure other than "vanished"          | `Fatal`   |
//! | walk failure other than "vanished"          | `Fatal`   |

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{DeckError, Result};
use crate::paths::{REPORT_SUFFIX, SUMMARY_FILE};
use crate::report::lenient;
use crate::trace_time;

/// Lightweight scan-derived metadata for one report file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Slash-joined path relative to the root; unique within a scan
    pub name: String,
    pub modified_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// Best-effort task label read from the file itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ReportRecord {
    /// Run key: the first path segment, or `""` for a flat corpus
    pub fn run(&self) -> &str {
        crate::index::run_key(&self.name)
    }
}

/// Why an entry produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Removed or renamed by a concurrent writer mid-scan
    Vanished,
}

/// Classification of one directory entry
#[derive(Debug)]
pub enum ScanEntry {
    Record(ReportRecord),
    Skipped { path: PathBuf, reason: SkipReason },
    Fatal(DeckError),
}

/// Fields read from each file while scanning
#[derive(Debug, Default, Deserialize)]
struct ReportMeta {
    #[serde(default, deserialize_with = "lenient::string")]
    task_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    task_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    scenario: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    model: Option<String>,
}

impl ReportMeta {
    fn label(self) -> Option<String> {
        self.task_name.or(self.task_id).or(self.scenario)
    }
}

/// Whether a file name is an eligible report
pub fn is_report_file(file_name: &str) -> bool {
    file_name.ends_with(REPORT_SUFFIX) && file_name != SUMMARY_FILE
}

fn vanished(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}

/// Slash-joined name of `path` relative to `root`
fn relative_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Classify one report file found under `root`
pub fn classify_file(root: &Path, path: &Path) -> ScanEntry {
    let (task_label, model) = match fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str::<ReportMeta>(&text) {
            Ok(mut meta) => {
                let model = meta.model.take().map(|m| m.trim().to_string());
                (meta.label(), model)
            }
            Err(e) => {
                tracing::trace!(path = %path.display(), error = %e, "unparseable report metadata");
                (None, None)
            }
        },
        Err(e) if vanished(&e) => {
            return ScanEntry::Skipped {
                path: path.to_path_buf(),
                reason: SkipReason::Vanished,
            }
        }
        Err(e) => {
            tracing::trace!(path = %path.display(), error = %e, "unreadable report metadata");
            (None, None)
        }
    };

    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if vanished(&e) => {
            return ScanEntry::Skipped {
                path: path.to_path_buf(),
                reason: SkipReason::Vanished,
            }
        }
        Err(e) => return ScanEntry::Fatal(DeckError::io_at("stat", path, e)),
    };
    let modified_at = match metadata.modified() {
        Ok(time) => DateTime::<Utc>::from(time),
        Err(e) => return ScanEntry::Fatal(DeckError::io_at("read mtime of", path, e)),
    };

    ScanEntry::Record(ReportRecord {
        name: relative_name(root, path),
        modified_at,
        size_bytes: metadata.len(),
        task_label,
        model,
    })
}

/// Walk `root` and classify every eligible entry in traversal order.
pub fn scan_entries(root: &Path) -> impl Iterator<Item = ScanEntry> + '_ {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                let eligible = entry.file_type().is_file()
                    && is_report_file(&entry.file_name().to_string_lossy());
                eligible.then(|| classify_file(root, entry.path()))
            }
            Err(e) if e.io_error().is_some_and(vanished) => Some(ScanEntry::Skipped {
                path: e.path().map(Path::to_path_buf).unwrap_or_default(),
                reason: SkipReason::Vanished,
            }),
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                Some(ScanEntry::Fatal(DeckError::io_at("walk", path, e)))
            }
        })
}

/// Scan the corpus, newest first.
///
/// A missing root is an empty corpus. The first fatal entry aborts the scan.
#[tracing::instrument(skip(root), fields(root = %root.display()))]
pub fn scan_corpus(root: &Path) -> Result<Vec<ReportRecord>> {
    let start = Instant::now();
    if !root.exists() {
        tracing::debug!("report root does not exist yet");
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for entry in scan_entries(root) {
        match entry {
            ScanEntry::Record(record) => records.push(record),
            ScanEntry::Skipped { path, reason } => {
                tracing::debug!(path = %path.display(), ?reason, "skipping entry");
                skipped += 1;
            }
            ScanEntry::Fatal(err) => {
                tracing::warn!(error = %err, "scan aborted");
                return Err(err);
            }
        }
    }

    // sort_by is stable: ties keep traversal order
    records.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
    trace_time!(start, "scan_corpus", records = records.len(), skipped = skipped);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    fn write_with_mtime(path: &Path, content: &str, secs_ago: u64) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        let mtime = SystemTime::now() - Duration::from_secs(secs_ago);
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempdir().unwrap();
        let records = scan_corpus(&dir.path().join("not-yet")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_counts_nested_reports_and_skips_summary_and_other_suffixes() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_with_mtime(&root.join("top.json"), "{}", 50);
        write_with_mtime(&root.join("r1/a.json"), r#"{"task_name":"A"}"#, 40);
        write_with_mtime(&root.join("r1/deep/b.json"), "{}", 30);
        write_with_mtime(&root.join("r2/c.json"), "{}", 20);
        write_with_mtime(&root.join("summary.json"), "{}", 10);
        write_with_mtime(&root.join("r1/summary.json"), "{}", 10);
        write_with_mtime(&root.join("r1/notes.txt"), "x", 10);
        write_with_mtime(&root.join("r2/c.json.bak"), "x", 10);

        let records = scan_corpus(root).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["r2/c.json", "r1/deep/b.json", "r1/a.json", "top.json"]);
        assert!(records
            .windows(2)
            .all(|w| w[0].modified_at >= w[1].modified_at));
    }

    #[test]
    fn test_label_and_model_are_best_effort() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_with_mtime(
            &root.join("r/with.json"),
            r#"{"task_id":"aws-sqs-create-queue","model":"gpt-x"}"#,
            2,
        );
        write_with_mtime(&root.join("r/broken.json"), "{ truncated", 1);

        let records = scan_corpus(root).unwrap();
        assert_eq!(records.len(), 2);
        let with = records.iter().find(|r| r.name == "r/with.json").unwrap();
        assert_eq!(with.task_label.as_deref(), Some("aws-sqs-create-queue"));
        assert_eq!(with.model.as_deref(), Some("gpt-x"));
        assert_eq!(with.run(), "r");
        let broken = records.iter().find(|r| r.name == "r/broken.json").unwrap();
        assert!(broken.task_label.is_none());
        assert_eq!(broken.size_bytes, "{ truncated".len() as u64);
    }

    #[test]
    fn test_model_is_trimmed_so_offered_models_match_records() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_with_mtime(&root.join("r1/a.json"), r#"{"model":"gpt-a "}"#, 20);
        write_with_mtime(&root.join("r1/b.json"), r#"{"model":"  gpt-a"}"#, 10);

        let records = scan_corpus(root).unwrap();
        assert!(records.iter().all(|r| r.model.as_deref() == Some("gpt-a")));

        let requested = crate::view::Selection {
            model: Some("gpt-a".into()),
            ..Default::default()
        };
        let state = crate::view::ViewState::derive(&records, None, &requested);
        assert_eq!(state.index.models, vec!["gpt-a".to_string()]);
        assert_eq!(state.selection.model.as_deref(), Some("gpt-a"));
        assert_eq!(state.visible.len(), 2);
    }

    #[test]
    fn test_vanished_file_is_skipped() {
        let dir = tempdir().unwrap();
        let entry = classify_file(dir.path(), &dir.path().join("gone.json"));
        assert!(matches!(
            entry,
            ScanEntry::Skipped {
                reason: SkipReason::Vanished,
                ..
            }
        ));
    }

    #[test]
    fn test_is_report_file() {
        assert!(is_report_file("x.json"));
        assert!(!is_report_file("summary.json"));
        assert!(!is_report_file("x.jsonl"));
    }
}
