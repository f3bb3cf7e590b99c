//! Query surface over a report corpus
//!
//! [`ReportService`] holds only the corpus root. Every call re-scans or
//! re-reads from disk so results always reflect what the harness has
//! written so far.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::index::{derive_title, CorpusIndex};
use crate::paths::{document_name, CorpusRoot, SUMMARY_FILE};
use crate::report::LoadedReport;
use crate::scan::{scan_corpus, ReportRecord};
use crate::summary::Summary;
use crate::view::{Selection, ViewState};

/// How listing entries are identified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingMode {
    /// Report names as they appear in the corpus
    #[default]
    Data,
    /// Document names inside a static bundle (`a/x.json` → `a/x.html`)
    Static,
}

/// Optional narrowing of a listing
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub run: Option<String>,
    pub model: Option<String>,
}

/// One listing row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportListing {
    /// Report name, or its bundle document name in static mode
    pub name: String,
    pub title: String,
    pub run: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_label: Option<String>,
    pub modified_at: DateTime<Utc>,
    pub size_bytes: u64,
}

impl ReportListing {
    fn from_record(record: &ReportRecord, mode: ListingMode) -> Self {
        let name = match mode {
            ListingMode::Data => record.name.clone(),
            ListingMode::Static => document_name(&record.name),
        };
        Self {
            name,
            title: derive_title(&record.name),
            run: record.run().to_string(),
            model: record.model.clone(),
            task_label: record.task_label.clone(),
            modified_at: record.modified_at,
            size_bytes: record.size_bytes,
        }
    }
}

/// Read-only access to one corpus
#[derive(Debug, Clone)]
pub struct ReportService {
    root: CorpusRoot,
}

impl ReportService {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            root: CorpusRoot::new(root)?,
        })
    }

    pub fn root(&self) -> &CorpusRoot {
        &self.root
    }

    /// Fresh scan of the corpus, newest first
    pub fn records(&self) -> Result<Vec<ReportRecord>> {
        scan_corpus(self.root.as_path())
    }

    /// List reports, newest first.
    pub fn list_reports(&self, filter: &ListFilter, mode: ListingMode) -> Result<Vec<ReportListing>> {
        let records = self.records()?;
        Ok(records
            .iter()
            .filter(|r| filter.run.as_deref().is_none_or(|run| r.run() == run))
            .filter(|r| {
                filter
                    .model
                    .as_deref()
                    .is_none_or(|model| r.model.as_deref() == Some(model))
            })
            .map(|r| ReportListing::from_record(r, mode))
            .collect())
    }

    /// Run groups and models for a fresh scan
    pub fn index(&self) -> Result<CorpusIndex> {
        Ok(CorpusIndex::build(&self.records()?))
    }

    /// Load one report by name.
    ///
    /// A missing file is logged at debug level; it usually means the caller
    /// holds a stale name from an earlier scan.
    #[tracing::instrument(skip(self))]
    pub fn get_report(&self, name: &str) -> Result<LoadedReport> {
        let path = self.root.resolve_report(name)?;
        LoadedReport::load(name, &path).inspect_err(|e| {
            if e.is_not_found() {
                tracing::debug!(name, "report not found");
            }
        })
    }

    /// The summary for the whole corpus or one run; `None` when absent.
    pub fn get_summary(&self, run: Option<&str>) -> Result<Option<Summary>> {
        let path = self.root.summary_path(run)?;
        Summary::load(&path)
    }

    /// Summary for display: a failed read degrades to absent.
    pub fn display_summary(&self, run: Option<&str>) -> Option<Summary> {
        match self.get_summary(run) {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(error = %e, "summary unavailable");
                None
            }
        }
    }

    /// Summary for a bundle: inside the root first, then its parent.
    pub fn bundle_summary(&self) -> Option<Summary> {
        let inner = self.root.join(SUMMARY_FILE);
        let outer = self.root.as_path().parent().map(|p| p.join(SUMMARY_FILE));
        Summary::load_first(std::iter::once(inner.as_path()).chain(outer.as_deref()))
    }

    /// Fresh [`ViewState`] for the live dashboard
    pub fn snapshot(&self, requested: &Selection) -> Result<ViewState> {
        let records = self.records()?;
        let summary = self.display_summary(None);
        Ok(ViewState::derive(&records, summary, requested))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeckError;
    use std::fs;
    use std::time::{Duration, SystemTime};
    use tempfile::{tempdir, TempDir};

    fn write_report(root: &Path, name: &str, body: &str, age_secs: u64) {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, body).unwrap();
        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
    }

    fn corpus() -> (TempDir, ReportService) {
        let dir = tempdir().unwrap();
        let root = dir.path().join("reports");
        write_report(&root, "r1/bucket-policy-1700000000123.json", r#"{"task_name":"Bucket","model":"gpt-a"}"#, 30);
        write_report(&root, "r2/queue.json", r#"{"task_id":"q","model":"gpt-b"}"#, 10);
        fs::write(root.join("summary.json"), r#"{"total_reports": 2}"#).unwrap();
        let service = ReportService::new(&root).unwrap();
        (dir, service)
    }

    #[test]
    fn test_list_reports_modes_and_filters() {
        let (_dir, service) = corpus();
        let all = service.list_reports(&ListFilter::default(), ListingMode::Data).unwrap();
        let names: Vec<_> = all.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["r2/queue.json", "r1/bucket-policy-1700000000123.json"]);
        assert_eq!(all[1].title, "Bucket Policy");
        assert_eq!(all[1].run, "r1");

        let filtered = service
            .list_reports(
                &ListFilter {
                    model: Some("gpt-a".into()),
                    ..ListFilter::default()
                },
                ListingMode::Static,
            )
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "r1/bucket-policy-1700000000123.html");
    }

    #[test]
    fn test_get_report_errors() {
        let (_dir, service) = corpus();
        assert_eq!(service.get_report("r2/queue.json").unwrap().detail.label(), "q");
        let missing = service.get_report("r2/gone.json").unwrap_err();
        assert!(missing.is_not_found());
        assert!(matches!(
            service.get_report("r2/queue.txt"),
            Err(DeckError::InvalidName { .. })
        ));
        assert!(matches!(
            service.get_report("../outside.json"),
            Err(DeckError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_summary_scoping() {
        let (_dir, service) = corpus();
        assert_eq!(service.get_summary(None).unwrap().unwrap().total_reports, Some(2));
        assert_eq!(service.get_summary(Some("r1")).unwrap(), None);
        assert!(matches!(
            service.get_summary(Some("nope/../escape")),
            Err(DeckError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_bundle_summary_falls_back_to_parent() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("reports");
        fs::create_dir_all(&root).unwrap();
        let service = ReportService::new(&root).unwrap();
        assert!(service.bundle_summary().is_none());
        fs::write(dir.path().join("summary.json"), r#"{"passed": 4}"#).unwrap();
        assert_eq!(service.bundle_summary().unwrap().passed, Some(4));
    }

    #[test]
    fn test_snapshot_repairs_selection() {
        let (_dir, service) = corpus();
        let state = service
            .snapshot(&Selection {
                run: Some("gone".into()),
                ..Selection::default()
            })
            .unwrap();
        assert_eq!(state.selection.run.as_deref(), Some("r2"));
        assert!(state.summary.is_some());
    }
}
