//! core::config
//!
//! Run configuration and startup preconditions.
//!
//! # Overview
//!
//! metafix has no configuration file. Every setting comes from the command
//! line and is carried in a [`RunConfig`] value that is passed explicitly
//! through the engine. [`RunConfig::prepare`] enforces the startup
//! preconditions before any traversal begins:
//!
//! 1. `move_unmatched` requires a destination
//! 2. Source and destination are created if missing (unless dry-run)
//! 3. Both must be directories
//! 4. The destination must not lie inside the source tree
//!
//! # Example
//!
//! ```no_run
//! use metafix::core::config::RunConfig;
//! use std::path::PathBuf;
//!
//! let config = RunConfig {
//!     source: PathBuf::from("Takeout"),
//!     destination: Some(PathBuf::from("sidecars")),
//!     move_unmatched: true,
//!     dry_run: false,
//! }
//! .prepare()
//! .unwrap();
//! assert!(config.policy().allow_unmatched_primary);
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from startup precondition checks.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `--move-unmatched` was given without a destination.
    #[error("moving unmatched metadata requires a metadata destination directory")]
    MoveUnmatchedWithoutDestination,

    /// A configured path exists but is not a directory.
    #[error("{} must be a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The destination would be walked as part of the source tree.
    #[error("metadata destination {} is inside source directory {}", destination.display(), source_dir.display())]
    DestinationInsideSource {
        source_dir: PathBuf,
        destination: PathBuf,
    },

    /// Creating or resolving a directory failed.
    #[error("failed to prepare {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Settings for one run over one export tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Root of the export tree.
    pub source: PathBuf,
    /// Where applied sidecars are moved, mirroring their source path.
    pub destination: Option<PathBuf>,
    /// Also move sidecars whose primary could not be resolved or applied.
    pub move_unmatched: bool,
    /// Report what would happen without touching the filesystem.
    pub dry_run: bool,
}

/// Matching policy derived from a [`RunConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchPolicy {
    /// Produce a record even when no primary path exists.
    pub allow_unmatched_primary: bool,
}

impl RunConfig {
    /// Check preconditions and normalize paths.
    ///
    /// On success both directories exist (unless dry-run skipped creating
    /// the destination) and the returned paths are absolute.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] before anything is traversed or moved.
    pub fn prepare(self) -> Result<Self, ConfigError> {
        if self.move_unmatched && self.destination.is_none() {
            return Err(ConfigError::MoveUnmatchedWithoutDestination);
        }

        let source = prepare_dir(&self.source, !self.dry_run)?;

        let destination = match &self.destination {
            Some(dest) => {
                let resolved = resolve_lexically(dest).map_err(|source| ConfigError::Io {
                    path: dest.clone(),
                    source,
                })?;
                if resolved.starts_with(&source) {
                    return Err(ConfigError::DestinationInsideSource {
                        source_dir: source,
                        destination: resolved,
                    });
                }
                if self.dry_run && !dest.exists() {
                    Some(resolved)
                } else {
                    Some(prepare_dir(dest, true)?)
                }
            }
            None => None,
        };

        Ok(Self {
            source,
            destination,
            ..self
        })
    }

    /// The matching policy for this run.
    pub fn policy(&self) -> MatchPolicy {
        MatchPolicy {
            allow_unmatched_primary: self.move_unmatched,
        }
    }
}

/// Canonicalize the longest existing prefix of `path` and append the rest.
fn resolve_lexically(path: &Path) -> io::Result<PathBuf> {
    let mut existing = path;
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    let base = if existing.as_os_str().is_empty() {
        std::env::current_dir()?
    } else {
        existing.canonicalize()?
    };
    Ok(missing.iter().rev().fold(base, |acc, name| acc.join(name)))
}

fn prepare_dir(path: &Path, create: bool) -> Result<PathBuf, ConfigError> {
    let io_err = |source: io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if create {
        fs::create_dir_all(path).map_err(io_err)?;
    }
    if !path.is_dir() {
        if path.exists() || create {
            return Err(ConfigError::NotADirectory(path.to_path_buf()));
        }
        return Err(io_err(io::Error::new(
            io::ErrorKind::NotFound,
            "directory does not exist",
        )));
    }
    path.canonicalize().map_err(io_err)
}
