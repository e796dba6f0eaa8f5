//! engine::runner
//!
//! The per-directory loop and run summary.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::core::config::RunConfig;
use crate::core::relocate::{destination_for, relocate};
use crate::core::types::{MetadataRecord, Resolution};
use crate::core::walk::{walk, DirectorySnapshot};
use crate::matchers::{self, Applied, Matcher};
use crate::ui::output::{self, format_path};

use super::Context;

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Directories visited.
    pub directories: usize,
    /// Records applied to an existing primary.
    pub fixed: usize,
    /// Records with no resolvable primary.
    pub unmatched: usize,
    /// Records that failed to apply or relocate.
    pub failed: usize,
    /// Sidecars that produced no record.
    pub skipped: usize,
    /// Sidecars moved to the destination.
    pub relocated: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fixed, {} unmatched, {} failed, {} skipped, {} moved across {} directories",
            self.fixed, self.unmatched, self.failed, self.skipped, self.relocated, self.directories
        )
    }
}

/// Result of applying one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Fixed,
    Unmatched,
    Failed,
}

/// Process every directory under the configured source.
///
/// `config` must already have passed [`RunConfig::prepare`].
pub fn fix_metadata(config: &RunConfig, ctx: &Context) -> RunSummary {
    let mut summary = RunSummary::default();
    for dir in walk(&config.source) {
        process_directory(&dir, config, ctx, &mut summary);
    }
    summary
}

/// Match, apply and relocate the sidecars of one directory.
pub fn process_directory(dir: &Path, config: &RunConfig, ctx: &Context, summary: &mut RunSummary) {
    let verbosity = ctx.verbosity();
    summary.directories += 1;

    let snapshot = match DirectorySnapshot::read(dir) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            output::error(format!("failed to read {}: {}", format_path(dir), err));
            return;
        }
    };
    output::debug(
        format!("{} ({} entries)", format_path(dir), snapshot.len()),
        verbosity,
    );

    let policy = config.policy();
    let mut records: Vec<MetadataRecord> = Vec::new();
    for (name, path) in snapshot.files() {
        let Some(matcher) = matchers::for_file_name(name) else {
            continue;
        };
        match matcher.attempt_match(path, &snapshot, &policy) {
            Some(record) => {
                output::debug(
                    format!(
                        "{} {} -> {} ({:?})",
                        record.source_kind,
                        format_path(&record.metadata_path),
                        format_path(&record.primary_path),
                        record.resolution
                    ),
                    verbosity,
                );
                records.push(record);
            }
            None => {
                summary.skipped += 1;
                output::debug(format!("no match for {}", format_path(path)), verbosity);
            }
        }
    }

    // Album records go last so their directory time is set after its
    // other sidecars have been handled.
    records.sort_by_key(|record| record.resolution == Resolution::Album);

    let mut moved_any = false;
    let mut fixed_albums: Vec<&MetadataRecord> = Vec::new();
    for record in &records {
        let outcome = apply_record(record, config, ctx);
        match outcome {
            Outcome::Fixed => summary.fixed += 1,
            Outcome::Unmatched => summary.unmatched += 1,
            Outcome::Failed => summary.failed += 1,
        }
        if outcome == Outcome::Fixed && record.resolution == Resolution::Album {
            fixed_albums.push(record);
        }

        let should_move = outcome == Outcome::Fixed || config.move_unmatched;
        if let (true, Some(dest)) = (should_move, config.destination.as_deref()) {
            if relocate_record(record, config, dest, ctx) {
                summary.relocated += 1;
                moved_any = true;
            } else {
                summary.failed += 1;
            }
        }
    }

    // Moving sidecars out of an album touches the album's own times.
    if moved_any && !config.dry_run {
        for record in fixed_albums {
            if let Err(err) = Matcher::for_kind(record.source_kind).apply(record, false) {
                output::error(format!("{}: {}", format_path(&record.primary_path), err));
            }
        }
    }
}

/// Apply one record and report the result.
fn apply_record(record: &MetadataRecord, config: &RunConfig, ctx: &Context) -> Outcome {
    let verbosity = ctx.verbosity();
    let matcher = Matcher::for_kind(record.source_kind);

    match matcher.apply(record, config.dry_run) {
        Ok(applied) => {
            let detail = match applied {
                Applied::Timestamp(ts) => format!(" ({})", ts),
                Applied::Verified => String::new(),
            };
            output::print(
                format!(
                    "fixed {} with {}{}",
                    format_path(&record.primary_path),
                    format_path(&record.metadata_path),
                    detail
                ),
                verbosity,
            );
            Outcome::Fixed
        }
        Err(err) if record.is_unmatched() => {
            output::print(
                format!("unmatched {}", format_path(&record.metadata_path)),
                verbosity,
            );
            output::debug(err, verbosity);
            Outcome::Unmatched
        }
        Err(err) => {
            output::error(format!("{}: {}", format_path(&record.primary_path), err));
            Outcome::Failed
        }
    }
}

/// Move a record's sidecar under `dest`. Returns whether it succeeded.
fn relocate_record(record: &MetadataRecord, config: &RunConfig, dest: &Path, ctx: &Context) -> bool {
    let verbosity = ctx.verbosity();

    let moved = if config.dry_run {
        destination_for(&record.metadata_path, &config.source, dest)
    } else {
        relocate(&record.metadata_path, &config.source, dest)
    };

    match moved {
        Ok(target) => {
            let verb = if config.dry_run { "would move" } else { "moved" };
            output::print(
                format!(
                    "{} {} -> {}",
                    verb,
                    format_path(&record.metadata_path),
                    format_path(&target)
                ),
                verbosity,
            );
            true
        }
        Err(err) => {
            output::error(err);
            false
        }
    }
}
