//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod completions;
pub mod evaluate;
pub mod inspect;

use crate::app::AppContext;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the retrieval evaluation over a dataset
    Evaluate(evaluate::EvaluateArgs),

    /// Summarize a dataset without running the evaluation
    Inspect(inspect::InspectArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Evaluate(args) => evaluate::run(ctx, args),
        Commands::Inspect(args) => inspect::run(ctx, args),
        Commands::Completions(args) => completions::run(args),
    }
}
