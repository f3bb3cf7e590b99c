//! `reportdeck bundle` - static HTML output

use serde_json::json;

use reportdeck_core::bundle::build_bundle;
use reportdeck_core::error::Result;

use super::dispatch::{trace_command, CommandContext};
use super::format::print_json;
use crate::cli::{BundleArgs, OutputFormat};

pub fn execute(ctx: &CommandContext, args: &BundleArgs) -> Result<()> {
    let outcome = build_bundle(
        &args.input,
        args.output.as_deref(),
        &ctx.config.bundle.output_dir,
    )?;
    trace_command!(ctx, "build_bundle");

    match ctx.cli.format {
        OutputFormat::Json => {
            let failures: Vec<_> = outcome
                .failures
                .iter()
                .map(|f| json!({"source": f.source, "reason": f.reason}))
                .collect();
            print_json(&json!({"written": outcome.written, "failures": failures}))?;
        }
        OutputFormat::Human => {
            for path in &outcome.written {
                println!("{}", path.display());
            }
        }
    }
    outcome.into_result().map(|_| ())
}
