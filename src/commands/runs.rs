//! `reportdeck runs` - run groups and models

use reportdeck_core::error::Result;

use super::dispatch::{trace_command, CommandContext};
use super::format::{format_timestamp, print_json};
use crate::cli::OutputFormat;

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let index = ctx.service()?.index()?;
    trace_command!(ctx, "build_index");

    match ctx.cli.format {
        OutputFormat::Json => print_json(&index),
        OutputFormat::Human => {
            if index.runs.is_empty() {
                if !ctx.cli.quiet {
                    println!("No runs found");
                }
                return Ok(());
            }
            for run in &index.runs {
                let name = if run.name.is_empty() { "(root)" } else { &run.name };
                println!(
                    "{}  {} report(s)  latest {}",
                    name,
                    run.count,
                    format_timestamp(&run.latest)
                );
            }
            if !index.models.is_empty() {
                println!();
                println!("Models: {}", index.models.join(", "));
            }
            Ok(())
        }
    }
}
