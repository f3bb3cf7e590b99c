//! Report data model
//!
//! A report is an open-ended JSON document written by the evaluation harness.
//! [`ReportDetail`] names the fields reportdeck understands; every one of them
//! is optional and decodes leniently, so formatting never fails on shape.

pub mod lenient;

use std::collections::BTreeMap;
use std::fs;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DeckError, Result};
use crate::paths::ReportPath;

/// Label used when a report names no task at all
pub const DEFAULT_TASK_LABEL: &str = "task";

/// Fully loaded content of one report file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportDetail {
    #[serde(default, deserialize_with = "lenient::string")]
    pub task_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub task_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub scenario: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub endpoint_url: Option<String>,
    /// Harness clock reading (monotonic seconds, not a date)
    #[serde(default, deserialize_with = "lenient::optional")]
    pub started_at: Option<f64>,
    /// Harness clock reading (monotonic seconds, not a date)
    #[serde(default, deserialize_with = "lenient::optional")]
    pub generated_at: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub metrics: Option<Metrics>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub verification: Option<Verification>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub actions: Vec<ActionEntry>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub notes: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub links: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub duration_seconds: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub step_count: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub error_action_penalty: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub cost_estimate_usd: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub passed: Option<bool>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub components: Option<BTreeMap<String, Value>>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub score_details: Option<ScoreDetails>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetails {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub timing: Option<TimingInfo>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub components: Option<BTreeMap<String, Value>>,
}

/// Wall-clock span of the verification step, in epoch seconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingInfo {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub started_at: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub ended_at: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub duration_seconds: Option<f64>,
}

/// One scored component as written by a verifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    #[serde(default, deserialize_with = "lenient::string")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub max: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
}

/// One action the agent performed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionEntry {
    #[serde(default, deserialize_with = "lenient::string")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub resource: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub metadata: Option<ActionMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionMetadata {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub result: Option<ActionResult>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub args: Option<ActionArgs>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub llm_trace: Option<LlmTrace>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    #[serde(default, deserialize_with = "lenient::string")]
    pub invoked_command: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub stdout: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub stderr: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionArgs {
    #[serde(default, deserialize_with = "lenient::string")]
    pub command: Option<String>,
}

/// Reasoning trace attached to an action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmTrace {
    #[serde(default)]
    pub prompt: Option<Value>,
    #[serde(default)]
    pub assistant: Option<Value>,
}

impl ReportDetail {
    /// Task label: `task_name`, then `task_id`, then `scenario`, then `"task"`.
    pub fn label(&self) -> &str {
        self.task_name
            .as_deref()
            .or(self.task_id.as_deref())
            .or(self.scenario.as_deref())
            .unwrap_or(DEFAULT_TASK_LABEL)
    }

    /// Verifier timing, when the verification step recorded one
    pub fn timing(&self) -> Option<&TimingInfo> {
        self.verification
            .as_ref()
            .and_then(|v| v.score_details.as_ref())
            .and_then(|d| d.timing.as_ref())
    }

    /// Decode a report from an already parsed JSON value
    pub fn from_value(value: &Value) -> std::result::Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

impl ActionEntry {
    /// Command shown in the CLI column: invoked command, then `args.command`.
    pub fn cli_command(&self) -> Option<&str> {
        let metadata = self.metadata.as_ref()?;
        metadata
            .result
            .as_ref()
            .and_then(|r| r.invoked_command.as_deref())
            .or_else(|| metadata.args.as_ref().and_then(|a| a.command.as_deref()))
    }

    pub fn result(&self) -> Option<&ActionResult> {
        self.metadata.as_ref().and_then(|m| m.result.as_ref())
    }

    pub fn llm_trace(&self) -> Option<&LlmTrace> {
        self.metadata.as_ref().and_then(|m| m.llm_trace.as_ref())
    }
}

/// A report loaded by name: raw payload plus its decoded view
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedReport {
    /// Slash-joined name relative to the corpus root
    pub name: String,
    /// Payload exactly as parsed from disk
    pub raw: Value,
    pub detail: ReportDetail,
}

impl LoadedReport {
    /// Read and parse one report.
    ///
    /// A missing file is `NotFound`; malformed JSON is a `Parse` error.
    pub fn load(name: &str, path: &ReportPath) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DeckError::not_found("report", name)
            } else {
                DeckError::io_at("read", path.as_path(), e)
            }
        })?;
        Self::parse(name, path, &text)
    }

    pub(crate) fn parse(name: &str, path: &ReportPath, text: &str) -> Result<Self> {
        let parse_err = |source| DeckError::Parse {
            path: path.to_path_buf(),
            source,
        };
        let raw: Value = serde_json::from_str(text).map_err(parse_err)?;
        let detail = ReportDetail::from_value(&raw).map_err(parse_err)?;
        Ok(Self {
            name: name.to_string(),
            raw,
            detail,
        })
    }
}
