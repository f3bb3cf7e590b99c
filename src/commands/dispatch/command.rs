//! Command trait and context for dispatching commands

use std::path::{Path, PathBuf};
use std::time::Instant;

use reportdeck_core::config::{DeckConfig, RunControlConfig};
use reportdeck_core::error::Result;
use reportdeck_core::run_control::HttpRunControl;
use reportdeck_core::service::ReportService;

use crate::cli::Cli;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub config: DeckConfig,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, config: DeckConfig, start: Instant) -> Self {
        Self { cli, config, start }
    }

    /// Corpus root: `--reports`, then config/env
    pub fn reports_dir(&self) -> &Path {
        self.cli
            .reports
            .as_deref()
            .unwrap_or(self.config.reports.dir.as_path())
    }

    pub fn service(&self) -> Result<ReportService> {
        ReportService::new(self.reports_dir())
    }

    /// Run-control settings with an optional `--endpoint` override applied
    pub fn run_control_config(&self, endpoint: Option<&str>) -> RunControlConfig {
        let mut config = self.config.run_control.clone();
        if let Some(endpoint) = endpoint {
            config.endpoint = endpoint.to_string();
        }
        config
    }

    pub fn run_control(&self, endpoint: Option<&str>) -> Result<HttpRunControl> {
        HttpRunControl::new(&self.run_control_config(endpoint))
    }

    /// `explicit`, or `fallback` from the configuration
    pub fn output_path(explicit: Option<&PathBuf>, fallback: &Path) -> PathBuf {
        explicit.cloned().unwrap_or_else(|| fallback.to_path_buf())
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("reportdeck {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Browse, watch and bundle agent evaluation reports.");
        println!();
        println!("Run `reportdeck --help` for usage information.");
        Ok(())
    }
}
