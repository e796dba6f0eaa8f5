//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Arguments
//!
//! - `SOURCE_DIRECTORY`: root of the export tree (created if missing)
//! - `METADATA_DESTINATION_DIRECTORY`: optional mirror for applied sidecars
//!
//! # Flags
//!
//! - `--move-unmatched` / `-u`: also move sidecars with no primary
//! - `--dry-run` / `-n`: report without changing anything
//! - `--quiet` / `-q`: minimal output
//! - `--debug`: show skipped sidecars and per-directory diagnostics
//! - `--json`: print the run summary as JSON

use clap::Parser;
use std::path::PathBuf;

use crate::core::config::RunConfig;
use crate::engine::Context;

/// metafix - Restore timestamps of exported photo archives from sidecar metadata
#[derive(Parser, Debug)]
#[command(name = "metafix")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # Fix timestamps in place, leaving sidecars where they are
    metafix Takeout/

    # Fix timestamps and move applied sidecars out of the tree
    metafix Takeout/ sidecars/

    # Also move sidecars whose photo could not be found
    metafix -u Takeout/ sidecars/

    # See what would happen
    metafix --dry-run Takeout/ sidecars/")]
pub struct Cli {
    /// Path to the root directory of an export
    #[arg(value_name = "SOURCE_DIRECTORY")]
    pub source_directory: PathBuf,

    /// Optional path to the root directory where applied metadata is moved
    #[arg(value_name = "METADATA_DESTINATION_DIRECTORY")]
    pub metadata_destination_directory: Option<PathBuf>,

    /// Move metadata files to the destination even when no primary file matches
    #[arg(short = 'u', long)]
    pub move_unmatched: bool,

    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// The run configuration described by these arguments.
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            source: self.source_directory.clone(),
            destination: self.metadata_destination_directory.clone(),
            move_unmatched: self.move_unmatched,
            dry_run: self.dry_run,
        }
    }

    /// The output context described by these arguments.
    pub fn context(&self) -> Context {
        Context {
            debug: self.debug,
            quiet: self.quiet,
            json: self.json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn positional_arguments() {
        let cli = Cli::try_parse_from(["metafix", "src", "dest"]).unwrap();
        let config = cli.run_config();
        assert_eq!(config.source, PathBuf::from("src"));
        assert_eq!(config.destination, Some(PathBuf::from("dest")));
        assert!(!config.move_unmatched);
    }

    #[test]
    fn destination_is_optional() {
        let cli = Cli::try_parse_from(["metafix", "src"]).unwrap();
        assert_eq!(cli.run_config().destination, None);
    }

    #[test]
    fn short_flags() {
        let cli = Cli::try_parse_from(["metafix", "-u", "-n", "-q", "src", "dest"]).unwrap();
        let config = cli.run_config();
        assert!(config.move_unmatched);
        assert!(config.dry_run);
        assert!(cli.context().quiet);
    }

    #[test]
    fn source_is_required() {
        assert!(Cli::try_parse_from(["metafix"]).is_err());
    }
}
