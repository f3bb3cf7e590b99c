//! `reportdeck evaluate` - trigger a run and wait for it

use std::time::Duration;

use serde_json::json;

use reportdeck_core::error::{DeckError, Result};
use reportdeck_core::poll::{PollOutcome, RepeatingTask};
use reportdeck_core::run_control::{await_terminal, RunControl, RunState};

use super::cancel_on_interrupt;
use super::dispatch::{trace_command, CommandContext};
use super::format::print_json;
use super::status::print_status_human;
use crate::cli::{EvaluateArgs, OutputFormat};

pub fn execute(ctx: &CommandContext, args: &EvaluateArgs) -> Result<()> {
    let config = ctx.run_control_config(args.endpoint.as_deref());
    let client = ctx.run_control(args.endpoint.as_deref())?;
    let agent = args.agent.clone().or_else(|| config.agent.clone());

    let ticket = client.trigger(agent.as_deref())?;
    trace_command!(ctx, "trigger_run");
    let human = ctx.cli.format == OutputFormat::Human && !ctx.cli.quiet;
    if human {
        println!("Started run {} ({})", ticket.run_id, ticket.status);
        if let Some(message) = &ticket.message {
            println!("  {message}");
        }
    }
    if args.no_wait {
        if ctx.cli.format == OutputFormat::Json {
            print_json(&ticket)?;
        }
        return Ok(());
    }

    let task = RepeatingTask::new(
        Duration::from_secs(config.poll_interval_secs.max(1)),
        cancel_on_interrupt(),
    )
    .with_timeout(Duration::from_secs(config.timeout_secs));
    let wait = await_terminal(&client, &ticket.run_id, &task);

    let (outcome, status) = match &wait.outcome {
        PollOutcome::Completed(status) => ("completed", Some(status)),
        PollOutcome::TimedOut => ("timed_out", wait.last_seen.as_ref()),
        PollOutcome::Cancelled => ("cancelled", wait.last_seen.as_ref()),
    };
    match ctx.cli.format {
        OutputFormat::Json => print_json(&json!({
            "run": ticket,
            "outcome": outcome,
            "status": status,
        }))?,
        OutputFormat::Human => {
            if let Some(status) = status {
                print_status_human(status);
            }
            if matches!(wait.outcome, PollOutcome::Cancelled) && !ctx.cli.quiet {
                println!("Stopped waiting; the run continues on the service");
            }
        }
    }

    match wait.outcome {
        PollOutcome::Completed(status) if status.status == RunState::Failed => Err(DeckError::Other(
            format!(
                "run {} failed: {}",
                status.run_id,
                status.error.as_deref().unwrap_or("no error reported")
            ),
        )),
        PollOutcome::TimedOut => Err(DeckError::Other(format!(
            "timed out after {}s waiting for run {}",
            config.timeout_secs, ticket.run_id
        ))),
        _ => Ok(()),
    }
}
