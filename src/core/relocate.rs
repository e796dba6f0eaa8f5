//! core::relocate
//!
//! Moves sidecar files into a destination tree that mirrors the source.
//!
//! A sidecar at `<source>/<rel>` ends at `<destination>/<rel>`. Missing
//! intermediate directories are created. The move is a rename, so source
//! and destination must be on the same filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from relocating a sidecar.
#[derive(Debug, Error)]
pub enum RelocateError {
    /// The sidecar does not live under the source root.
    #[error("{} is not inside {}", path.display(), root.display())]
    OutsideSource { path: PathBuf, root: PathBuf },

    /// Creating directories or renaming failed.
    #[error("failed to move {} to {}: {source}", from.display(), to.display())]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Compute where `metadata_path` lands under `dest_root`.
///
/// # Example
///
/// ```
/// use metafix::core::relocate::destination_for;
/// use std::path::Path;
///
/// let dest = destination_for(
///     Path::new("/takeout/AlbumX/photo.json"),
///     Path::new("/takeout"),
///     Path::new("/sidecars"),
/// )
/// .unwrap();
/// assert_eq!(dest, Path::new("/sidecars/AlbumX/photo.json"));
/// ```
pub fn destination_for(
    metadata_path: &Path,
    source_root: &Path,
    dest_root: &Path,
) -> Result<PathBuf, RelocateError> {
    let relative =
        metadata_path
            .strip_prefix(source_root)
            .map_err(|_| RelocateError::OutsideSource {
                path: metadata_path.to_path_buf(),
                root: source_root.to_path_buf(),
            })?;
    Ok(dest_root.join(relative))
}

/// Move `metadata_path` to its mirrored location under `dest_root`.
///
/// Returns the new path of the sidecar.
pub fn relocate(
    metadata_path: &Path,
    source_root: &Path,
    dest_root: &Path,
) -> Result<PathBuf, RelocateError> {
    let target = destination_for(metadata_path, source_root, dest_root)?;
    let io_err = |source: io::Error| RelocateError::Io {
        from: metadata_path.to_path_buf(),
        to: target.clone(),
        source,
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::rename(metadata_path, &target).map_err(io_err)?;
    Ok(target)
}
