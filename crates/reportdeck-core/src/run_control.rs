//! Client for the external run-control service
//!
//! The service owns evaluation runs; reportdeck only asks it to start one and
//! then reads its status. Endpoints:
//! - `POST {endpoint}/api/evaluate` with `{"agent_name": ...}`
//! - `GET {endpoint}/api/status/{run_id}`

use std::fmt;
use std::ops::ControlFlow;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::RunControlConfig;
use crate::error::{DeckError, Result};
use crate::poll::{PollOutcome, RepeatingTask};
use crate::report::lenient;
use crate::{bail_invalid, bail_usage};

/// Lifecycle state reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunState {
    Queued,
    Running,
    Completed,
    Failed,
    Other(String),
}

impl From<String> for RunState {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "queued" | "pending" => RunState::Queued,
            "running" => RunState::Running,
            "completed" => RunState::Completed,
            "failed" => RunState::Failed,
            _ => RunState::Other(raw),
        }
    }
}

impl From<RunState> for String {
    fn from(state: RunState) -> Self {
        state.to_string()
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Queued => f.write_str("queued"),
            RunState::Running => f.write_str("running"),
            RunState::Completed => f.write_str("completed"),
            RunState::Failed => f.write_str("failed"),
            RunState::Other(raw) => f.write_str(raw),
        }
    }
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Failed)
    }
}

/// Response to a trigger request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTicket {
    pub run_id: String,
    pub status: RunState,
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: Option<String>,
}

/// One status observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatus {
    pub run_id: String,
    pub status: RunState,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub started_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub completed_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub error: Option<String>,
    /// Report written by the finished run, relative to the corpus root
    #[serde(default, deserialize_with = "lenient::string")]
    pub report_path: Option<String>,
}

/// The two operations reportdeck needs from the service
pub trait RunControl {
    fn trigger(&self, agent: Option<&str>) -> Result<RunTicket>;
    fn status(&self, run_id: &str) -> Result<RunStatus>;
}

/// Result of waiting on a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunWait {
    pub outcome: PollOutcome<RunStatus>,
    /// Most recent status seen before a timeout or cancellation
    pub last_seen: Option<RunStatus>,
}

/// Poll `run_id` until it reaches a terminal state.
///
/// Failed status queries are logged and the next tick tries again; only
/// `task`'s timeout or cancellation ends the wait without a terminal state.
pub fn await_terminal(client: &dyn RunControl, run_id: &str, task: &RepeatingTask) -> RunWait {
    let mut last_seen: Option<RunStatus> = None;
    let outcome = task.run(|tick| match client.status(run_id) {
        Ok(status) => {
            tracing::debug!(run_id, tick, status = %status.status, "run status");
            if status.status.is_terminal() {
                return ControlFlow::Break(status);
            }
            last_seen = Some(status);
            ControlFlow::Continue(())
        }
        Err(e) => {
            tracing::warn!(run_id, tick, error = %e, "status query failed");
            ControlFlow::Continue(())
        }
    });
    RunWait { outcome, last_seen }
}

fn validate_run_id(run_id: &str) -> Result<()> {
    let valid = !run_id.is_empty()
        && run_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        bail_invalid!("run id", run_id);
    }
    Ok(())
}

/// HTTP implementation over `ureq`
pub struct HttpRunControl {
    endpoint: String,
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpRunControl {
    pub fn new(config: &RunControlConfig) -> Result<Self> {
        if !config.is_configured() {
            bail_usage!(
                "no run-control endpoint configured (set [run_control] endpoint, REPORTDECK_RUN_CONTROL_URL or --endpoint)"
            );
        }
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.request_timeout_secs)))
            .http_status_as_error(false)
            .build();
        Ok(Self {
            endpoint: config.endpoint.trim().trim_end_matches('/').to_string(),
            agent: ureq::Agent::new_with_config(agent_config),
            user_agent: format!(
                "reportdeck/{} ({})",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS
            ),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Read the body of a finished exchange, mapping HTTP failures.
    fn read_body(
        &self,
        result: std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error>,
        not_found: Option<(&str, &str)>,
    ) -> Result<String> {
        let mut response =
            result.map_err(|e| DeckError::ServiceUnavailable(format!("{}: {e}", self.endpoint)))?;
        let status = response.status().as_u16();
        if status == 404 {
            if let Some((context, value)) = not_found {
                return Err(DeckError::not_found(context, value));
            }
        }
        if !(200..300).contains(&status) {
            return Err(DeckError::ServiceUnavailable(format!(
                "{} returned HTTP {status}",
                self.endpoint
            )));
        }
        response
            .body_mut()
            .read_to_string()
            .map_err(|e| DeckError::ServiceUnavailable(format!("reading response: {e}")))
    }
}

fn decode<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| DeckError::ServiceUnavailable(format!("unexpected response: {e}")))
}

impl RunControl for HttpRunControl {
    #[tracing::instrument(skip(self))]
    fn trigger(&self, agent: Option<&str>) -> Result<RunTicket> {
        let payload = serde_json::json!({ "agent_name": agent });
        let result = self
            .agent
            .post(&self.url("/api/evaluate"))
            .header("Content-Type", "application/json")
            .header("User-Agent", &self.user_agent)
            .send(payload.to_string());
        let body = self.read_body(result, None)?;
        decode(&body)
    }

    #[tracing::instrument(skip(self))]
    fn status(&self, run_id: &str) -> Result<RunStatus> {
        validate_run_id(run_id)?;
        let result = self
            .agent
            .get(&self.url(&format!("/api/status/{run_id}")))
            .header("User-Agent", &self.user_agent)
            .call();
        let body = self.read_body(result, Some(("run", run_id)))?;
        decode(&body)
    }
}
