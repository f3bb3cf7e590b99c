//! Reportdeck - browse, watch and bundle agent evaluation reports
//!
//! Scans a directory of JSON evaluation reports and renders them as a
//! terminal listing, a live dashboard document, or a static HTML bundle.

mod cli;
mod commands;

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::Parser;

use cli::{Cli, OutputFormat};
use reportdeck_core::error::{DeckError, ExitCode as DeckExitCode};
use reportdeck_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return parse_failure(err),
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => ExitCode::from(DeckExitCode::Success as u8),
        Err(e) => {
            report(&cli, &e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Handle a command line clap rejected.
///
/// Help and version output keep clap's own behaviour. Everything else is a
/// JSON envelope on stderr when `--format json` appears in argv.
fn parse_failure(err: clap::Error) -> ExitCode {
    if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) || !argv_requests_json() {
        err.exit();
    }
    let error = match err.kind() {
        ErrorKind::ValueValidation
        | ErrorKind::InvalidValue
        | ErrorKind::InvalidSubcommand
        | ErrorKind::UnknownArgument
        | ErrorKind::ArgumentConflict
        | ErrorKind::MissingRequiredArgument => DeckError::UsageError(err.to_string()),
        _ => DeckError::Other(err.to_string()),
    };
    eprintln!("{}", error.to_json());
    ExitCode::from(error.exit_code() as u8)
}

fn report(cli: &Cli, error: &DeckError) {
    match cli.format {
        OutputFormat::Json => eprintln!("{}", error.to_json()),
        OutputFormat::Human if !cli.quiet => eprintln!("error: {}", error),
        OutputFormat::Human => {}
    }
}

/// `--format json` or `--format=json` anywhere on the command line
fn argv_requests_json() -> bool {
    let args: Vec<String> = env::args().skip(1).collect();
    args.iter().any(|a| a == "--format=json")
        || args.windows(2).any(|w| w[0] == "--format" && w[1] == "json")
}
