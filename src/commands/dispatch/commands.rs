//! Routing from parsed subcommands to their implementations

use reportdeck_core::error::Result;

use super::command::{Command, CommandContext};
use crate::cli::Commands;
use crate::commands;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::List(args) => commands::list::execute(ctx, args),
            Commands::Runs => commands::runs::execute(ctx),
            Commands::Show(args) => commands::show::execute(ctx, args),
            Commands::Summary(args) => commands::summary::execute(ctx, args),
            Commands::Bundle(args) => commands::bundle::execute(ctx, args),
            Commands::Watch(args) => commands::watch::execute(ctx, args),
            Commands::Evaluate(args) => commands::evaluate::execute(ctx, args),
            Commands::Status(args) => commands::status::execute(ctx, args),
        }
    }
}
