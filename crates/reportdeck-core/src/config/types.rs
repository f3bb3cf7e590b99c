//! Configuration type definitions

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default report corpus directory, relative to the working directory
pub const DEFAULT_REPORT_DIR: &str = "reports";

/// Default static bundle output directory
pub const DEFAULT_BUNDLE_DIR: &str = "site";

/// Default live dashboard document
pub const DEFAULT_LIVE_OUTPUT: &str = "dashboard.html";

/// Top-level reportdeck configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Report corpus settings
    #[serde(default)]
    pub reports: ReportsConfig,

    /// Live mode settings
    #[serde(default)]
    pub live: LiveConfig,

    /// Static bundle settings
    #[serde(default)]
    pub bundle: BundleConfig,

    /// External run-control service settings
    #[serde(default)]
    pub run_control: RunControlConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Root of the report corpus
    #[serde(default = "default_report_dir")]
    pub dir: PathBuf,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            dir: default_report_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveConfig {
    /// Seconds between re-scans
    #[serde(default = "default_live_interval")]
    pub interval_secs: u64,

    /// Dashboard document rewritten on every refresh
    #[serde(default = "default_live_output")]
    pub output: PathBuf,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_live_interval(),
            output: default_live_output(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Output directory used when a directory is bundled without `--output`
    #[serde(default = "default_bundle_dir")]
    pub output_dir: PathBuf,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            output_dir: default_bundle_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunControlConfig {
    /// Base URL of the run-control service (empty means not configured)
    #[serde(default)]
    pub endpoint: String,

    /// Agent requested when triggering an evaluation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    /// Seconds between status polls
    #[serde(default = "default_status_interval")]
    pub poll_interval_secs: u64,

    /// Seconds after which status polling gives up
    #[serde(default = "default_status_timeout")]
    pub timeout_secs: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for RunControlConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            agent: None,
            poll_interval_secs: default_status_interval(),
            timeout_secs: default_status_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl RunControlConfig {
    /// Check if an endpoint is configured
    pub fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }
}

fn default_report_dir() -> PathBuf {
    PathBuf::from(DEFAULT_REPORT_DIR)
}

fn default_live_interval() -> u64 {
    5
}

fn default_live_output() -> PathBuf {
    PathBuf::from(DEFAULT_LIVE_OUTPUT)
}

fn default_bundle_dir() -> PathBuf {
    PathBuf::from(DEFAULT_BUNDLE_DIR)
}

fn default_status_interval() -> u64 {
    2
}

fn default_status_timeout() -> u64 {
    30 * 60
}

fn default_request_timeout() -> u64 {
    10
}
