//! Per-command argument structures

use std::path::PathBuf;

use clap::Args;

/// Arguments for the list command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only reports in this run
    #[arg(long)]
    pub run: Option<String>,

    /// Only reports produced by this model
    #[arg(long)]
    pub model: Option<String>,

    /// Show bundle document names (`run/x.html`) instead of report names
    #[arg(long = "static")]
    pub static_names: bool,
}

/// Arguments for the show command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Report name relative to the corpus root (e.g. `run-1/bucket-policy.json`)
    pub name: String,
}

/// Arguments for the summary command.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Read `<run>/summary.json` instead of the corpus-wide summary
    #[arg(long)]
    pub run: Option<String>,
}

/// Arguments for the bundle command.
#[derive(Args, Debug)]
pub struct BundleArgs {
    /// A report file or a corpus directory
    pub input: PathBuf,

    /// Output document (file input) or directory (directory input)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Arguments for the watch command.
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Initially selected run (defaults to the most recent)
    #[arg(long)]
    pub run: Option<String>,

    /// Model filter
    #[arg(long)]
    pub model: Option<String>,

    /// Report to show in the detail pane
    #[arg(long)]
    pub report: Option<String>,

    /// Show the leaderboard panel
    #[arg(long)]
    pub summary: bool,

    /// Dashboard document to write (defaults to `[live] output`)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Seconds between re-scans (defaults to `[live] interval_secs`)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Render once and exit
    #[arg(long)]
    pub once: bool,
}

/// Arguments for the evaluate command.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Agent to evaluate (defaults to `[run_control] agent`)
    #[arg(long)]
    pub agent: Option<String>,

    /// Run-control service base URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Return after triggering without polling for completion
    #[arg(long)]
    pub no_wait: bool,
}

/// Arguments for the status command.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Run identifier returned by `evaluate`
    pub run_id: String,

    /// Run-control service base URL
    #[arg(long)]
    pub endpoint: Option<String>,
}
