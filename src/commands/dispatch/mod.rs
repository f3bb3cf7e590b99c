//! Command dispatch logic for reportdeck

use std::time::Instant;

use reportdeck_core::config::DeckConfig;
use reportdeck_core::error::Result;
use tracing::debug;

use crate::cli::Cli;

mod command;
mod commands;
mod macros;

pub(crate) use command::CommandContext;
use command::{Command, NoCommand};
pub(crate) use macros::trace_command;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let config = DeckConfig::resolve(cli.config.as_deref())?;
    debug!(elapsed = ?start.elapsed(), "resolve_config");

    let ctx = CommandContext::new(cli, config, start);

    match &cli.command {
        None => NoCommand.execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    }
}
