//! `reportdeck show` - one report by name

use reportdeck_core::detail::{DetailView, LIVE_PREVIEW_CHARS};
use reportdeck_core::error::Result;

use super::dispatch::{trace_command, CommandContext};
use super::format::print_json;
use crate::cli::{OutputFormat, ShowArgs};

pub fn execute(ctx: &CommandContext, args: &ShowArgs) -> Result<()> {
    let report = ctx.service()?.get_report(&args.name)?;
    trace_command!(ctx, "load_report");

    match ctx.cli.format {
        OutputFormat::Json => print_json(&report.raw),
        OutputFormat::Human => {
            print!("{}", DetailView::build(&report.detail, LIVE_PREVIEW_CHARS).to_text());
            Ok(())
        }
    }
}
