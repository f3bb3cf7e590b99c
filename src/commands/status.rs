//! `reportdeck status` - one run-status query

use reportdeck_core::error::Result;
use reportdeck_core::run_control::{RunControl, RunStatus};

use super::dispatch::CommandContext;
use super::format::print_json;
use crate::cli::{OutputFormat, StatusArgs};

pub(crate) fn print_status_human(status: &RunStatus) {
    println!("{}  {}", status.run_id, status.status);
    for (label, value) in [
        ("created", &status.created_at),
        ("started", &status.started_at),
        ("completed", &status.completed_at),
        ("report", &status.report_path),
        ("error", &status.error),
    ] {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
}

pub fn execute(ctx: &CommandContext, args: &StatusArgs) -> Result<()> {
    let client = ctx.run_control(args.endpoint.as_deref())?;
    let status = client.status(&args.run_id)?;

    match ctx.cli.format {
        OutputFormat::Json => print_json(&status),
        OutputFormat::Human => {
            print_status_human(&status);
            Ok(())
        }
    }
}
