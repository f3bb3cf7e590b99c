//! `reportdeck summary` - the externally computed leaderboard

use reportdeck_core::error::Result;
use reportdeck_core::summary::render_summary_text;

use super::dispatch::CommandContext;
use super::format::print_json;
use crate::cli::{OutputFormat, SummaryArgs};

pub fn execute(ctx: &CommandContext, args: &SummaryArgs) -> Result<()> {
    let summary = ctx.service()?.get_summary(args.run.as_deref())?;

    match ctx.cli.format {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Human => {
            print!("{}", render_summary_text(summary.as_ref()));
            Ok(())
        }
    }
}
