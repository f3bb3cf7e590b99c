//! Display-ready sections for one report
//!
//! [`DetailView::build`] applies every fallback rule up front so the HTML and
//! text renderers only lay out values that already exist.

pub mod log_block;
mod render;

use chrono::{DateTime, Utc};
use serde_json::Value;

pub use log_block::{LogBlock, LIVE_PREVIEW_CHARS, PLACEHOLDER, STATIC_PREVIEW_CHARS};

use crate::html::class_token;
use crate::report::{ActionEntry, ReportDetail, ScoreComponent};

/// Component key for the synthesized error-action deduction
pub const PENALTY_KEY: &str = "error_action_penalty";

/// Label for the synthesized error-action deduction
pub const PENALTY_LABEL: &str = "Error action penalty (deducted per failed action)";

/// Normalized difficulty tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// Unrecognized values pass through unchanged
    Other(String),
}

impl Difficulty {
    /// Case-insensitive prefix match on `easy`/`med`/`hard`; blank yields `None`.
    pub fn normalize(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lower = trimmed.to_lowercase();
        Some(if lower.starts_with("easy") {
            Difficulty::Easy
        } else if lower.starts_with("med") {
            Difficulty::Medium
        } else if lower.starts_with("hard") {
            Difficulty::Hard
        } else {
            Difficulty::Other(raw.to_string())
        })
    }

    pub fn tag(&self) -> &str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Other(raw) => raw,
        }
    }

    /// CSS class for the chip
    pub fn class(&self) -> &'static str {
        match self {
            Difficulty::Easy => "difficulty-easy",
            Difficulty::Medium => "difficulty-medium",
            Difficulty::Hard => "difficulty-hard",
            Difficulty::Other(_) => "difficulty-other",
        }
    }
}

/// Two decimals, or the placeholder dash
pub fn format_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => PLACEHOLDER.to_string(),
    }
}

fn format_epoch(secs: Option<f64>) -> String {
    secs.filter(|s| s.is_finite())
        .and_then(|s| DateTime::<Utc>::from_timestamp_millis((s * 1000.0).round() as i64))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRow {
    pub key: String,
    pub label: String,
    pub value: String,
    pub max: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionRow {
    /// 1-based position in the report
    pub index: usize,
    pub name: String,
    /// Status reduced to a CSS-safe class token
    pub status_class: String,
    pub status: String,
    pub cli: String,
    pub stdout: LogBlock,
    pub stderr: LogBlock,
}

/// A note or link entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkItem {
    Link(String),
    Text(String),
}

impl LinkItem {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) if s.starts_with("http") => LinkItem::Link(s.clone()),
            Value::String(s) => LinkItem::Text(s.clone()),
            other => LinkItem::Text(other.to_string()),
        }
    }
}

/// Reasoning trace panels for one action
#[derive(Debug, Clone, PartialEq)]
pub struct TraceView {
    /// 1-based index of the action carrying the trace
    pub index: usize,
    pub action: String,
    pub prompt: String,
    pub assistant: String,
}

/// Every display section of one report
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub label: String,
    pub difficulty: Option<Difficulty>,
    pub description: Option<String>,
    pub model: Option<String>,
    pub category: Option<String>,
    pub endpoint_url: Option<String>,
    pub passed: Option<bool>,
    /// Harness clock at start, in seconds
    pub started_at: String,
    /// Harness clock when the report was written, in seconds
    pub generated_at: String,
    /// Wall-clock start of verification
    pub verified_from: String,
    /// Wall-clock end of verification
    pub verified_until: String,
    pub metrics: Vec<MetricRow>,
    pub components: Vec<ComponentRow>,
    pub actions: Vec<ActionRow>,
    pub notes: Vec<LinkItem>,
    pub links: Vec<LinkItem>,
    pub traces: Vec<TraceView>,
    pub errors: Vec<String>,
}

/// Score components with the synthesized penalty appended when missing.
pub fn score_components(detail: &ReportDetail) -> Vec<(String, ScoreComponent)> {
    let verification = detail.verification.as_ref();
    let primary = verification
        .and_then(|v| v.score_details.as_ref())
        .and_then(|d| d.components.as_ref())
        .filter(|c| !c.is_empty());
    let source = primary.or_else(|| verification.and_then(|v| v.components.as_ref()));

    let mut components: Vec<(String, ScoreComponent)> = source
        .map(|map| {
            map.iter()
                .map(|(key, value)| {
                    let component = ScoreComponent::deserialize_lenient(value);
                    (key.clone(), component)
                })
                .collect()
        })
        .unwrap_or_default();

    let penalty = detail.metrics.as_ref().and_then(|m| m.error_action_penalty);
    if let Some(penalty) = penalty {
        if !components.iter().any(|(key, _)| key == PENALTY_KEY) {
            components.push((
                PENALTY_KEY.to_string(),
                ScoreComponent {
                    label: Some(PENALTY_LABEL.to_string()),
                    // 0.0 - |p| keeps a zero penalty from printing as "-0.00"
                    value: Some(0.0 - penalty.abs()),
                    max: None,
                    description: None,
                },
            ));
        }
    }
    components
}

impl ScoreComponent {
    fn deserialize_lenient(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

fn metric_rows(detail: &ReportDetail) -> Vec<MetricRow> {
    let m = detail.metrics.clone().unwrap_or_default();
    vec![
        MetricRow {
            label: "Score",
            value: format_number(m.score),
        },
        MetricRow {
            label: "Duration (s)",
            value: format_number(m.duration_seconds),
        },
        MetricRow {
            label: "Steps",
            value: format_number(m.step_count),
        },
        MetricRow {
            label: "Error action penalty",
            value: format_number(m.error_action_penalty),
        },
        MetricRow {
            label: "Cost estimate (USD)",
            value: format_number(m.cost_estimate_usd),
        },
    ]
}

fn action_row(index: usize, entry: &ActionEntry, preview_len: usize) -> ActionRow {
    let status = entry.status.clone().unwrap_or_default();
    let result = entry.result();
    ActionRow {
        index,
        name: entry
            .action
            .clone()
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        status_class: class_token(&status),
        status: if status.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            status
        },
        cli: entry.cli_command().unwrap_or(PLACEHOLDER).to_string(),
        stdout: LogBlock::decide(result.and_then(|r| r.stdout.as_deref()), preview_len),
        stderr: LogBlock::decide(result.and_then(|r| r.stderr.as_deref()), preview_len),
    }
}

fn pretty(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => PLACEHOLDER.to_string(),
        Some(v) => serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()),
    }
}

fn traces(detail: &ReportDetail) -> Vec<TraceView> {
    detail
        .actions
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            let trace = entry.llm_trace()?;
            Some(TraceView {
                index: i + 1,
                action: entry
                    .action
                    .clone()
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
                prompt: pretty(trace.prompt.as_ref()),
                assistant: pretty(trace.assistant.as_ref()),
            })
        })
        .collect()
}

impl DetailView {
    /// Build display sections, collapsing logs longer than `preview_len` characters.
    pub fn build(detail: &ReportDetail, preview_len: usize) -> Self {
        let verification = detail.verification.as_ref();
        Self {
            label: detail.label().to_string(),
            difficulty: Difficulty::normalize(detail.difficulty.as_deref()),
            description: detail.description.clone(),
            model: detail.model.clone(),
            category: detail.category_name.clone(),
            endpoint_url: detail.endpoint_url.clone(),
            passed: verification.and_then(|v| v.passed),
            started_at: format_number(detail.started_at),
            generated_at: format_number(detail.generated_at),
            verified_from: format_epoch(detail.timing().and_then(|t| t.started_at)),
            verified_until: format_epoch(detail.timing().and_then(|t| t.ended_at)),
            metrics: metric_rows(detail),
            components: score_components(detail)
                .into_iter()
                .map(|(key, c)| ComponentRow {
                    label: c.label.unwrap_or_else(|| key.clone()),
                    key,
                    value: format_number(c.value),
                    max: format_number(c.max),
                })
                .collect(),
            actions: detail
                .actions
                .iter()
                .enumerate()
                .map(|(i, entry)| action_row(i + 1, entry, preview_len))
                .collect(),
            notes: detail.notes.iter().map(LinkItem::from_value).collect(),
            links: detail.links.iter().map(LinkItem::from_value).collect(),
            traces: traces(detail),
            errors: verification.map(|v| v.errors.clone()).unwrap_or_default(),
        }
    }
}
