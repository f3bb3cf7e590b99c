//! `reportdeck list` - list reports, newest first

use reportdeck_core::error::Result;
use reportdeck_core::service::{ListFilter, ListingMode};

use super::dispatch::{trace_command, CommandContext};
use super::format::{format_timestamp, print_json};
use crate::cli::{ListArgs, OutputFormat};

pub fn execute(ctx: &CommandContext, args: &ListArgs) -> Result<()> {
    let service = ctx.service()?;
    let filter = ListFilter {
        run: args.run.clone(),
        model: args.model.clone(),
    };
    let mode = if args.static_names {
        ListingMode::Static
    } else {
        ListingMode::Data
    };
    let reports = service.list_reports(&filter, mode)?;
    trace_command!(ctx, "list_reports");

    match ctx.cli.format {
        OutputFormat::Json => print_json(&reports),
        OutputFormat::Human => {
            if reports.is_empty() {
                if !ctx.cli.quiet {
                    println!("No reports found");
                }
                return Ok(());
            }
            for report in &reports {
                println!(
                    "{}  {}  {}  [{}]  {}",
                    format_timestamp(&report.modified_at),
                    report.name,
                    report.title,
                    report.model.as_deref().unwrap_or("-"),
                    report.task_label.as_deref().unwrap_or("-"),
                );
            }
            Ok(())
        }
    }
}
