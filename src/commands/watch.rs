//! `reportdeck watch` - keep the live dashboard document current

use std::ops::ControlFlow;
use std::time::Duration;

use serde_json::json;

use reportdeck_core::bundle::{LiveDashboard, LiveFrame};
use reportdeck_core::error::Result;
use reportdeck_core::index::run_key;
use reportdeck_core::poll::{PollOutcome, RepeatingTask};
use reportdeck_core::view::Selection;

use super::cancel_on_interrupt;
use super::dispatch::CommandContext;
use super::format::print_json_line;
use crate::cli::{OutputFormat, WatchArgs};

/// Initial selection from flags; a report without a run selects its run.
fn initial_selection(args: &WatchArgs) -> Selection {
    let run = args
        .run
        .clone()
        .or_else(|| args.report.as_deref().map(|r| run_key(r).to_string()));
    Selection {
        run,
        model: args.model.clone(),
        report: args.report.clone(),
        show_summary: args.summary,
    }
}

fn announce(ctx: &CommandContext, dashboard: &LiveDashboard, frame: &LiveFrame) -> Result<()> {
    let state = &frame.state;
    match ctx.cli.format {
        OutputFormat::Json => print_json_line(&json!({
            "output": dashboard.output(),
            "selection": state.selection,
            "visible": state.visible.len(),
            "report_vanished": state.report_vanished,
        })),
        OutputFormat::Human => {
            if ctx.cli.quiet {
                return Ok(());
            }
            println!(
                "wrote {} ({} report(s) in run {})",
                dashboard.output().display(),
                state.visible.len(),
                state.selection.run.as_deref().unwrap_or("-")
            );
            if state.report_vanished {
                println!("selected report is gone; showing placeholder");
            }
            Ok(())
        }
    }
}

pub fn execute(ctx: &CommandContext, args: &WatchArgs) -> Result<()> {
    let output = CommandContext::output_path(args.output.as_ref(), &ctx.config.live.output);
    let interval = args.interval.unwrap_or(ctx.config.live.interval_secs).max(1);
    let mut dashboard = LiveDashboard::new(ctx.service()?, output, interval);
    let mut selection = initial_selection(args);

    if args.once {
        let (frame, _) = dashboard.refresh(&selection)?;
        return announce(ctx, &dashboard, &frame);
    }

    let task = RepeatingTask::new(Duration::from_secs(interval), cancel_on_interrupt());
    let outcome = task.run(|tick| {
        match dashboard.refresh(&selection) {
            Ok((frame, changed)) => {
                if changed {
                    if let Err(e) = announce(ctx, &dashboard, &frame) {
                        tracing::warn!(error = %e, "failed to report refresh");
                    }
                }
                selection = frame.state.selection;
            }
            Err(e) => tracing::warn!(tick, error = %e, "refresh failed"),
        }
        ControlFlow::<()>::Continue(())
    });

    if outcome == PollOutcome::Cancelled && !ctx.cli.quiet && ctx.cli.format == OutputFormat::Human {
        println!("stopped");
    }
    Ok(())
}
