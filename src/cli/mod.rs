//! cli
//!
//! Command-line interface layer for metafix.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments
//! - Enforce startup preconditions before anything is traversed
//! - Delegate to the engine and print the run summary
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, prepares a
//! [`RunConfig`](crate::core::config::RunConfig), and hands it to
//! [`crate::engine::fix_metadata`].

pub mod args;

pub use args::Cli;

use anyhow::{Context as _, Result};

use crate::engine::{self, Context, RunSummary};
use crate::ui::output;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    run_with(&cli).map(|_| ())
}

/// Run with already parsed arguments.
pub fn run_with(cli: &Cli) -> Result<RunSummary> {
    let ctx = cli.context();
    let config = cli
        .run_config()
        .prepare()
        .context("invalid arguments")?;

    output::debug(
        format!("source: {}", output::format_path(&config.source)),
        ctx.verbosity(),
    );

    let summary = engine::fix_metadata(&config, &ctx);
    report(&summary, &ctx)?;
    Ok(summary)
}

fn report(summary: &RunSummary, ctx: &Context) -> Result<()> {
    if ctx.json {
        println!(
            "{}",
            serde_json::to_string_pretty(summary).context("failed to serialize summary")?
        );
    } else {
        output::print(summary, ctx.verbosity());
    }
    Ok(())
}
