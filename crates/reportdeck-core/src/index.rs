//! Run and model grouping over a scanned corpus
//!
//! Everything here is a pure projection of the current [`ReportRecord`] set
//! and is rebuilt from scratch after every scan.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::paths::REPORT_SUFFIX;
use crate::scan::ReportRecord;

/// Title used when a slug yields no words
pub const FALLBACK_TITLE: &str = "Report";

/// Reports sharing their first path segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunGroup {
    /// First path segment; empty for a flat corpus
    pub name: String,
    pub count: usize,
    /// Most recent `modified_at` among members
    pub latest: DateTime<Utc>,
}

/// Run groups and distinct models for one scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorpusIndex {
    /// Sorted by `latest`, newest first
    pub runs: Vec<RunGroup>,
    /// Distinct non-empty models, sorted
    pub models: Vec<String>,
}

/// Run key of a report name: text before the first `/`, or `""`.
pub fn run_key(name: &str) -> &str {
    match name.split_once('/') {
        Some((run, _)) => run,
        None => "",
    }
}

fn timestamp_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-\d{10,}$").expect("static regex"))
}

/// Human title from a report name: `run/bucket-policy-1700000000123.json` → `Bucket Policy`.
pub fn derive_title(name: &str) -> String {
    let slug = name.rsplit('/').next().unwrap_or(name);
    let slug = slug.strip_suffix(REPORT_SUFFIX).unwrap_or(slug);
    let slug = timestamp_suffix().replace(slug, "");

    let words: Vec<String> = slug
        .split('-')
        .filter(|token| !token.is_empty())
        .map(capitalize)
        .collect();

    if words.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        words.join(" ")
    }
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl CorpusIndex {
    /// Group records into runs and collect the distinct models.
    pub fn build(records: &[ReportRecord]) -> Self {
        let mut runs: Vec<RunGroup> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut models = BTreeSet::new();

        for record in records {
            let key = record.run();
            match positions.get(key) {
                Some(&i) => {
                    let group = &mut runs[i];
                    group.count += 1;
                    group.latest = group.latest.max(record.modified_at);
                }
                None => {
                    positions.insert(key, runs.len());
                    runs.push(RunGroup {
                        name: key.to_string(),
                        count: 1,
                        latest: record.modified_at,
                    });
                }
            }
            if let Some(model) = record.model.as_deref().filter(|m| !m.trim().is_empty()) {
                models.insert(model.to_string());
            }
        }

        runs.sort_by(|a, b| b.latest.cmp(&a.latest));
        Self {
            runs,
            models: models.into_iter().collect(),
        }
    }

    pub fn has_run(&self, name: &str) -> bool {
        self.runs.iter().any(|r| r.name == name)
    }

    /// Keep `previous` if it still exists, else fall back to the most recent run.
    pub fn select_run(&self, previous: Option<&str>) -> Option<String> {
        match previous {
            Some(name) if self.has_run(name) => Some(name.to_string()),
            _ => self.runs.first().map(|r| r.name.clone()),
        }
    }
}
