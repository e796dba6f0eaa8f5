//! engine
//!
//! Orchestrates a run: Walk -> Snapshot -> Match -> Apply -> Relocate.
//!
//! # Lifecycle
//!
//! For every directory yielded by [`crate::core::walk::walk`]:
//!
//! ```text
//! Snapshot -> Match every sidecar -> Apply each record -> [Relocate]
//! ```
//!
//! All records of a directory are matched against the same snapshot before
//! any of them is applied or moved.
//!
//! # Invariants
//!
//! - Directories are processed one at a time, in walk order
//! - A failure on one sidecar never stops the directory or the run
//! - Only sidecars that produced a record are ever relocated

pub mod runner;

pub use runner::{fix_metadata, process_directory, Outcome, RunSummary};

use crate::ui::output::Verbosity;

/// Execution context for a run.
///
/// Contains output settings derived from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Print the run summary as JSON.
    pub json: bool,
}

impl Context {
    /// Verbosity for per-record output.
    ///
    /// JSON mode keeps stdout for the summary alone.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet || self.json, self.debug)
    }
}
