//! CLI argument parsing for reportdeck
//!
//! Global flags: --reports, --config, --format, --quiet, --verbose

pub mod args;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{
    BundleArgs, EvaluateArgs, ListArgs, ShowArgs, StatusArgs, SummaryArgs, WatchArgs,
};
pub use output::OutputFormat;

/// Reportdeck - browse and bundle agent evaluation reports
#[derive(Parser, Debug)]
#[command(name = "reportdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Report corpus root (overrides config and REPORTDECK_REPORT_DIR)
    #[arg(long, global = true)]
    pub reports: Option<PathBuf>,

    /// Explicit config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Debug logging and phase timings
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level or filter directive (e.g. `debug`, `reportdeck_core=trace`)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List reports, newest first
    List(ListArgs),

    /// List run groups and models
    Runs,

    /// Show one report
    Show(ShowArgs),

    /// Show the leaderboard summary
    Summary(SummaryArgs),

    /// Render a report file or a corpus directory as static HTML
    Bundle(BundleArgs),

    /// Keep a live dashboard document up to date
    Watch(WatchArgs),

    /// Trigger an evaluation run and wait for it to finish
    Evaluate(EvaluateArgs),

    /// Query the status of an evaluation run
    Status(StatusArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["reportdeck", "list", "--format", "json", "--run", "r1"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Some(Commands::List(args)) => assert_eq!(args.run.as_deref(), Some("r1")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_watch_defaults() {
        let cli = Cli::try_parse_from(["reportdeck", "watch", "--once"]).unwrap();
        match cli.command {
            Some(Commands::Watch(args)) => {
                assert!(args.once);
                assert!(args.interval.is_none());
                assert!(!args.summary);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
