//! Leaderboard rendering for an externally computed summary
//!
//! The harness writes `summary.json`; reportdeck only formats it and never
//! recomputes any statistic.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detail::{format_number, PLACEHOLDER};
use crate::error::{DeckError, Result};
use crate::html::escape;
use crate::report::lenient;

/// Per-model or per-task totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelStats {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub passed: Option<u64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub failed: Option<u64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub avg_score: Option<f64>,
    /// Fraction in `0.0..=1.0`
    #[serde(default, deserialize_with = "lenient::optional")]
    pub pass_rate: Option<f64>,
}

/// The summary object as written by the harness
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub total_reports: Option<u64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub passed: Option<u64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub failed: Option<u64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub avg_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub pass_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub by_task: Option<BTreeMap<String, ModelStats>>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub by_difficulty: Option<BTreeMap<String, u64>>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub by_model: Option<BTreeMap<String, ModelStats>>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub by_model_difficulty: Option<BTreeMap<String, BTreeMap<String, ModelStats>>>,
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummaryRow {
    pub model: String,
    pub stats: ModelStats,
    /// Per-difficulty breakdown, sorted by difficulty key
    pub difficulty: Vec<(String, ModelStats)>,
}

fn count(value: Option<u64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}

/// Fraction rendered as a percentage with one decimal
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) if r.is_finite() => format!("{:.1}%", r * 100.0),
        _ => PLACEHOLDER.to_string(),
    }
}

impl ModelSummaryRow {
    /// `"count runs, pass rate%, avg score"` per difficulty, joined by `"; "`
    pub fn difficulty_mix(&self) -> String {
        if self.difficulty.is_empty() {
            return PLACEHOLDER.to_string();
        }
        self.difficulty
            .iter()
            .map(|(key, stats)| {
                format!(
                    "{}: {} runs, {}, {}",
                    key,
                    count(stats.count),
                    format_rate(stats.pass_rate),
                    format_number(stats.avg_score)
                )
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl Summary {
    /// Read a summary file; a missing file is `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DeckError::io_at("read", path, e)),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| DeckError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Load the first summary found among `candidates`.
    ///
    /// Unreadable candidates are logged and skipped.
    pub fn load_first<'a, I>(candidates: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        candidates.into_iter().find_map(|path| match Self::load(path) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable summary");
                None
            }
        })
    }

    /// Leaderboard rows, sorted by model name
    pub fn rows(&self) -> Vec<ModelSummaryRow> {
        let empty = BTreeMap::new();
        let by_difficulty = self.by_model_difficulty.as_ref().unwrap_or(&empty);
        self.by_model
            .iter()
            .flatten()
            .map(|(model, stats)| ModelSummaryRow {
                model: model.clone(),
                stats: stats.clone(),
                difficulty: by_difficulty
                    .get(model)
                    .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Per-task totals, sorted by task id
    pub fn task_rows(&self) -> Vec<(&str, &ModelStats)> {
        self.by_task
            .iter()
            .flatten()
            .map(|(task, stats)| (task.as_str(), stats))
            .collect()
    }

    fn totals_line(&self) -> Option<String> {
        self.total_reports?;
        Some(format!(
            "{} reports, {} passed, {} failed, avg score {}, pass rate {}",
            count(self.total_reports),
            count(self.passed),
            count(self.failed),
            format_number(self.avg_score),
            format_rate(self.pass_rate)
        ))
    }

    fn difficulty_counts(&self) -> Option<String> {
        let counts = self.by_difficulty.as_ref().filter(|m| !m.is_empty())?;
        Some(
            counts
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Leaderboard panel; an absent summary renders a visible placeholder.
pub fn render_summary_html(summary: Option<&Summary>) -> String {
    let mut html = String::from(r#"<section class="card summary"><h2>Leaderboard</h2>"#);
    let Some(summary) = summary else {
        html.push_str(r#"<p class="placeholder summary-unavailable">Summary unavailable</p></section>"#);
        return html;
    };
    if let Some(line) = summary.totals_line() {
        let _ = write!(html, r#"<p class="totals">{}</p>"#, escape(&line));
    }
    if let Some(line) = summary.difficulty_counts() {
        let _ = write!(html, r#"<p class="difficulty-counts">{}</p>"#, escape(&line));
    }
    let rows = summary.rows();
    if rows.is_empty() {
        html.push_str(r#"<p class="placeholder">No models yet</p>"#);
    } else {
        html.push_str(concat!(
            r#"<table class="leaderboard"><tr><th>Model</th><th class="num">Runs</th>"#,
            r#"<th class="num">Passed</th><th class="num">Failed</th><th class="num">Avg score</th>"#,
            r#"<th class="num">Pass rate</th><th>Difficulty mix</th></tr>"#
        ));
        for row in &rows {
            let _ = write!(
                html,
                r#"<tr><td>{}</td>{}<td>{}</td></tr>"#,
                escape(&row.model),
                stats_cells(&row.stats),
                escape(&row.difficulty_mix()),
            );
        }
        html.push_str("</table>");
    }
    let tasks = summary.task_rows();
    if !tasks.is_empty() {
        html.push_str(concat!(
            r#"<h3>By task</h3><table class="leaderboard tasks"><tr><th>Task</th><th class="num">Runs</th>"#,
            r#"<th class="num">Passed</th><th class="num">Failed</th><th class="num">Avg score</th>"#,
            r#"<th class="num">Pass rate</th></tr>"#
        ));
        for (task, stats) in tasks {
            let _ = write!(html, "<tr><td>{}</td>{}</tr>", escape(task), stats_cells(stats));
        }
        html.push_str("</table>");
    }
    html.push_str("</section>");
    html
}

fn stats_cells(stats: &ModelStats) -> String {
    format!(
        concat!(
            r#"<td class="num">{}</td><td class="num">{}</td><td class="num">{}</td>"#,
            r#"<td class="num">{}</td><td class="num">{}</td>"#
        ),
        count(stats.count),
        count(stats.passed),
        count(stats.failed),
        format_number(stats.avg_score),
        format_rate(stats.pass_rate),
    )
}

fn stats_text(stats: &ModelStats) -> String {
    format!(
        "runs={} passed={} failed={} avg={} pass_rate={}",
        count(stats.count),
        count(stats.passed),
        count(stats.failed),
        format_number(stats.avg_score),
        format_rate(stats.pass_rate)
    )
}

/// Terminal leaderboard
pub fn render_summary_text(summary: Option<&Summary>) -> String {
    let Some(summary) = summary else {
        return "Summary unavailable\n".to_string();
    };
    let mut out = String::new();
    if let Some(line) = summary.totals_line() {
        let _ = writeln!(out, "{line}");
    }
    if let Some(line) = summary.difficulty_counts() {
        let _ = writeln!(out, "difficulty: {line}");
    }
    let rows = summary.rows();
    if rows.is_empty() {
        out.push_str("No models yet\n");
    }
    for row in rows {
        let _ = writeln!(
            out,
            "{}  {}  [{}]",
            row.model,
            stats_text(&row.stats),
            row.difficulty_mix()
        );
    }
    let tasks = summary.task_rows();
    if !tasks.is_empty() {
        out.push_str("\nBy task:\n");
        for (task, stats) in tasks {
            let _ = writeln!(out, "  {}  {}", task, stats_text(stats));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn sample() -> Summary {
        serde_json::from_value(json!({
            "total_reports": 3, "passed": 2, "failed": 1, "avg_score": 0.7, "pass_rate": 0.6667,
            "by_difficulty": {"easy": 2, "hard": 1},
            "by_task": {
                "s3-bucket": {"count": 2, "passed": 2, "failed": 0, "avg_score": 0.95, "pass_rate": 1.0},
                "<sqs>": {"count": 1, "passed": 0, "failed": 1, "avg_score": 0.2, "pass_rate": 0.0}
            },
            "by_model": {
                "gpt-b": {"count": 1, "passed": 0, "failed": 1, "avg_score": 0.2, "pass_rate": 0.0},
                "gpt-a": {"count": 2, "passed": 2, "failed": 0, "avg_score": 0.95, "pass_rate": 1.0}
            },
            "by_model_difficulty": {
                "gpt-a": {"easy": {"count": 2, "pass_rate": 1.0, "avg_score": 0.95}}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_rows_are_formatted_not_recomputed() {
        let summary = sample();
        let rows = summary.rows();
        assert_eq!(rows[0].model, "gpt-a");
        assert_eq!(rows[0].difficulty_mix(), "easy: 2 runs, 100.0%, 0.95");
        assert_eq!(rows[1].difficulty_mix(), "-");

        let html = render_summary_html(Some(&summary));
        assert!(html.contains("<td>gpt-a</td>"));
        assert!(html.contains("100.0%"));
        assert!(html.contains("0.20"));
        assert!(html.contains("3 reports, 2 passed, 1 failed, avg score 0.70, pass rate 66.7%"));
        assert!(html.contains("easy: 2, hard: 1"));

        let tasks = summary.task_rows();
        assert_eq!(tasks[0].0, "<sqs>");
        assert_eq!(tasks[1].1.avg_score, Some(0.95));
        assert!(html.contains("<h3>By task</h3>"));
        assert!(html.contains("<td>&lt;sqs&gt;</td>"));
        assert!(html.contains(r#"<td>s3-bucket</td><td class="num">2</td>"#));
    }

    #[test]
    fn test_task_table_renders_without_models() {
        let summary: Summary =
            serde_json::from_value(json!({"by_task": {"queue": {"count": 4, "pass_rate": 0.5}}}))
                .unwrap();
        let html = render_summary_html(Some(&summary));
        assert!(html.contains("No models yet"));
        assert!(html.contains("<td>queue</td>"));
        assert!(html.contains("50.0%"));
        assert!(html.ends_with("</section>"));
        let text = render_summary_text(Some(&summary));
        assert!(text.contains("  queue  runs=4 passed=- failed=- avg=- pass_rate=50.0%"));
    }

    #[test]
    fn test_absent_summary_is_visible() {
        let html = render_summary_html(None);
        assert!(html.contains("Summary unavailable"));
        let empty = render_summary_html(Some(&Summary::default()));
        assert!(empty.contains("No models yet"));
        assert!(!empty.contains("Summary unavailable"));
    }

    #[test]
    fn test_model_names_are_escaped() {
        let summary: Summary =
            serde_json::from_value(json!({"by_model": {"<script>m</script>": {"count": 1}}}))
                .unwrap();
        let html = render_summary_html(Some(&summary));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_load_missing_and_first_found() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("summary.json");
        assert_eq!(Summary::load(&missing).unwrap(), None);

        let nested = dir.path().join("run");
        fs::create_dir_all(&nested).unwrap();
        fs::write(&missing, r#"{"total_reports": 9}"#).unwrap();
        let inner = nested.join("summary.json");
        let found = Summary::load_first([inner.as_path(), missing.as_path()]).unwrap();
        assert_eq!(found.total_reports, Some(9));

        fs::write(&inner, "{ bad").unwrap();
        assert!(Summary::load(&inner).is_err());
        let found = Summary::load_first([inner.as_path(), missing.as_path()]).unwrap();
        assert_eq!(found.total_reports, Some(9));
    }

    #[test]
    fn test_text_rendering() {
        assert_eq!(render_summary_text(None), "Summary unavailable\n");
        let text = render_summary_text(Some(&sample()));
        assert!(text.contains("gpt-a  runs=2 passed=2 failed=0 avg=0.95 pass_rate=100.0%"));
        assert!(text.contains("By task:\n  <sqs>  runs=1 passed=0 failed=1 avg=0.20 pass_rate=0.0%"));
    }
}
