//! matchers
//!
//! Sidecar matchers: locate the primary path a metadata file belongs to,
//! then apply the metadata to it.
//!
//! # Variants
//!
//! - [`json`] - `.json` sidecars carrying titles and timestamps
//! - [`html`] - `.html` comment sidecars carrying only a title
//!
//! Exports from different eras use different sidecar formats and a single
//! tree may mix them, so every variant is tried for every file. The variant
//! set is closed; dispatch goes through the [`Matcher`] enum and the fixed
//! [`REGISTRY`].
//!
//! # Failure model
//!
//! [`Matcher::attempt_match`] never fails: unreadable or malformed sidecars
//! and unresolvable titles yield `None`. [`Matcher::apply`] reports failure
//! through [`ApplyError`] and never panics; the caller reports it and moves
//! on.

pub mod html;
pub mod json;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::config::MatchPolicy;
use crate::core::types::{MetadataRecord, Resolution, SourceKind, Title, UtcTimestamp};
use crate::core::walk::DirectorySnapshot;

/// Errors from applying a record to its primary path.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The primary path does not exist at apply time.
    #[error("primary path {} does not exist", .0.display())]
    PrimaryMissing(PathBuf),

    /// None of the timestamp fields yielded a usable value.
    #[error("no usable timestamp in {}", .0.display())]
    NoTimestamp(PathBuf),

    /// Setting the primary's times failed.
    #[error("failed to set times on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What a successful apply did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Access and modify times were set (or would be, in dry-run).
    Timestamp(UtcTimestamp),
    /// The association was confirmed; nothing was mutated.
    Verified,
}

/// A sidecar format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    Json,
    Html,
}

/// All matchers, in the order they are tried.
pub const REGISTRY: &[Matcher] = &[Matcher::Json, Matcher::Html];

impl Matcher {
    /// File name suffixes this matcher reads.
    pub fn compatible_suffixes(self) -> &'static [&'static str] {
        match self {
            Matcher::Json => json::SUFFIXES,
            Matcher::Html => html::SUFFIXES,
        }
    }

    /// Whether `file_name` carries one of this matcher's suffixes.
    pub fn is_compatible(self, file_name: &str) -> bool {
        self.compatible_suffixes()
            .iter()
            .any(|suffix| file_name.ends_with(suffix))
    }

    /// Try to resolve the primary path for `metadata_path`.
    pub fn attempt_match(
        self,
        metadata_path: &Path,
        snapshot: &DirectorySnapshot,
        policy: &MatchPolicy,
    ) -> Option<MetadataRecord> {
        match self {
            Matcher::Json => json::attempt_match(metadata_path, snapshot, policy),
            Matcher::Html => html::attempt_match(metadata_path, snapshot, policy),
        }
    }

    /// Apply a record produced by this matcher.
    ///
    /// With `dry_run` set nothing on disk is changed, but the same checks
    /// run.
    pub fn apply(self, record: &MetadataRecord, dry_run: bool) -> Result<Applied, ApplyError> {
        match self {
            Matcher::Json => json::apply(record, dry_run),
            Matcher::Html => html::apply(record),
        }
    }

    /// The matcher responsible for a sidecar kind.
    pub fn for_kind(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Json => Matcher::Json,
            SourceKind::Html => Matcher::Html,
        }
    }
}

/// The matcher that reads `file_name`, if any.
///
/// The first compatible matcher in [`REGISTRY`] order decides, so a sidecar
/// yields at most one record.
pub fn for_file_name(file_name: &str) -> Option<Matcher> {
    REGISTRY
        .iter()
        .copied()
        .find(|matcher| matcher.is_compatible(file_name))
}

/// Resolve a title against a directory's children.
///
/// Order, first hit wins:
/// 1. a sibling named exactly `title`
/// 2. the containing directory itself, if `album` and its name is `title`
/// 3. the would-be sibling path, if unmatched primaries are allowed
pub(crate) fn resolve_primary(
    title: &Title,
    snapshot: &DirectorySnapshot,
    policy: &MatchPolicy,
    album: bool,
) -> Option<(PathBuf, Resolution)> {
    if let Some(entry) = snapshot.get(title.as_str()) {
        return Some((entry.path.clone(), Resolution::Sibling));
    }
    if album && snapshot.dir_name() == Some(title.as_str()) {
        return Some((snapshot.dir().to_path_buf(), Resolution::Album));
    }
    if policy.allow_unmatched_primary {
        return Some((snapshot.dir().join(title.as_str()), Resolution::Unmatched));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn suffixes_are_disjoint() {
        for name in ["a.json", "a.html"] {
            let hits = REGISTRY.iter().filter(|m| m.is_compatible(name)).count();
            assert_eq!(hits, 1, "{name}");
        }
    }

    #[test]
    fn suffix_match_is_case_sensitive() {
        assert!(!Matcher::Json.is_compatible("A.JSON"));
        assert!(Matcher::Json.is_compatible("A.jpg.json"));
        assert!(!Matcher::Html.is_compatible("comments.htm"));
    }

    #[test]
    fn kind_selects_matcher() {
        assert_eq!(Matcher::for_kind(SourceKind::Json), Matcher::Json);
        assert_eq!(Matcher::for_kind(SourceKind::Html), Matcher::Html);
    }

    #[test]
    fn file_name_selects_matcher() {
        assert_eq!(for_file_name("IMG_1.jpg.json"), Some(Matcher::Json));
        assert_eq!(for_file_name("IMG_1.jpg.html"), Some(Matcher::Html));
        assert_eq!(for_file_name("IMG_1.jpg"), None);
    }

    mod resolve {
        use super::*;

        #[test]
        fn sibling_beats_album() {
            let tmp = TempDir::new().unwrap();
            let album = tmp.path().join("Trip");
            fs::create_dir_all(album.join("Trip")).unwrap();
            let snapshot = DirectorySnapshot::read(&album).unwrap();
            let title = Title::new("Trip").unwrap();

            let (path, resolution) =
                resolve_primary(&title, &snapshot, &MatchPolicy::default(), true).unwrap();
            assert_eq!(resolution, Resolution::Sibling);
            assert_eq!(path, album.join("Trip"));
        }

        #[test]
        fn album_only_when_enabled() {
            let tmp = TempDir::new().unwrap();
            let album = tmp.path().join("Trip");
            fs::create_dir_all(&album).unwrap();
            let snapshot = DirectorySnapshot::read(&album).unwrap();
            let title = Title::new("Trip").unwrap();

            let found = resolve_primary(&title, &snapshot, &MatchPolicy::default(), true);
            assert_eq!(found, Some((album.clone(), Resolution::Album)));
            assert!(resolve_primary(&title, &snapshot, &MatchPolicy::default(), false).is_none());
        }

        #[test]
        fn unmatched_points_at_would_be_sibling() {
            let tmp = TempDir::new().unwrap();
            let snapshot = DirectorySnapshot::read(tmp.path()).unwrap();
            let title = Title::new("gone.jpg").unwrap();
            let policy = MatchPolicy {
                allow_unmatched_primary: true,
            };

            let (path, resolution) = resolve_primary(&title, &snapshot, &policy, true).unwrap();
            assert_eq!(resolution, Resolution::Unmatched);
            assert_eq!(path, tmp.path().join("gone.jpg"));
        }
    }
}
