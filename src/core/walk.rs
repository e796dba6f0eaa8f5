//! core::walk
//!
//! Directory traversal and per-directory snapshots.
//!
//! # Ordering
//!
//! [`walk`] yields directories depth-first in post-order: every child
//! directory is yielded before its parent, siblings in lexicographic order
//! of file name, and the root last. Album-level metadata is therefore
//! always processed after the album's own contents.
//!
//! Symbolic links are not followed. Cyclic trees are not guarded against.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Enumerate the directories under `root`, children before parents.
///
/// Each call performs a fresh traversal. Entries that cannot be read are
/// skipped.
///
/// # Example
///
/// ```no_run
/// use metafix::core::walk::walk;
/// use std::path::Path;
///
/// for dir in walk(Path::new("Takeout")) {
///     println!("{}", dir.display());
/// }
/// ```
pub fn walk(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .contents_first(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .map(walkdir::DirEntry::into_path)
}

/// Kind of a directory child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

/// A child of a snapshotted directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// The children of one directory, keyed by exact name.
///
/// Built fresh per directory and never cached across runs.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    dir: PathBuf,
    entries: BTreeMap<OsString, SnapshotEntry>,
}

impl DirectorySnapshot {
    /// Read the children of `dir`.
    ///
    /// Children whose metadata cannot be read are recorded as
    /// [`EntryKind::Other`].
    pub fn read(dir: &Path) -> io::Result<Self> {
        let mut entries = BTreeMap::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let kind = match entry.file_type() {
                Ok(ft) if ft.is_dir() => EntryKind::Directory,
                Ok(ft) if ft.is_file() => EntryKind::File,
                _ => EntryKind::Other,
            };
            entries.insert(
                entry.file_name(),
                SnapshotEntry {
                    path: entry.path(),
                    kind,
                },
            );
        }
        Ok(Self {
            dir: dir.to_path_buf(),
            entries,
        })
    }

    /// The directory this snapshot was taken of.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The directory's own name, if it has one.
    pub fn dir_name(&self) -> Option<&str> {
        self.dir.file_name().and_then(|name| name.to_str())
    }

    /// Whether a child with exactly this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(std::ffi::OsStr::new(name))
    }

    /// Look up a child by exact name.
    pub fn get(&self, name: &str) -> Option<&SnapshotEntry> {
        self.entries.get(std::ffi::OsStr::new(name))
    }

    /// Regular files with UTF-8 names, in name order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().filter_map(|(name, entry)| {
            if entry.kind != EntryKind::File {
                return None;
            }
            name.to_str().map(|name| (name, entry.path.as_path()))
        })
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the directory had no children.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn walk_is_post_order_with_sorted_siblings() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("b/inner")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::create_dir_all(root.join("c")).unwrap();
        touch(&root.join("a/file.jpg"));

        let dirs: Vec<PathBuf> = walk(root).collect();
        assert_eq!(
            dirs,
            vec![
                root.join("a"),
                root.join("b/inner"),
                root.join("b"),
                root.join("c"),
                root.to_path_buf(),
            ]
        );
    }

    #[test]
    fn walk_skips_files() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("photo.jpg"));
        let dirs: Vec<PathBuf> = walk(tmp.path()).collect();
        assert_eq!(dirs, vec![tmp.path().to_path_buf()]);
    }

    #[test]
    fn walk_of_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(walk(&tmp.path().join("nope")).count(), 0);
    }

    #[test]
    fn walk_is_restartable() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("x")).unwrap();
        let first: Vec<PathBuf> = walk(tmp.path()).collect();
        let second: Vec<PathBuf> = walk(tmp.path()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn snapshot_records_kinds_and_names() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("photo.jpg"));
        fs::create_dir(tmp.path().join("Album")).unwrap();

        let snapshot = DirectorySnapshot::read(tmp.path()).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains("photo.jpg"));
        assert!(snapshot.contains("Album"));
        assert!(!snapshot.contains("photo"));
        assert_eq!(snapshot.get("Album").unwrap().kind, EntryKind::Directory);

        let files: Vec<&str> = snapshot.files().map(|(name, _)| name).collect();
        assert_eq!(files, vec!["photo.jpg"]);
    }

    #[test]
    fn snapshot_files_are_name_ordered() {
        let tmp = TempDir::new().unwrap();
        for name in ["c.json", "a.json", "b.html"] {
            touch(&tmp.path().join(name));
        }
        let snapshot = DirectorySnapshot::read(tmp.path()).unwrap();
        let files: Vec<&str> = snapshot.files().map(|(name, _)| name).collect();
        assert_eq!(files, vec!["a.json", "b.html", "c.json"]);
    }

    #[test]
    fn snapshot_dir_name() {
        let tmp = TempDir::new().unwrap();
        let album = tmp.path().join("Summer 2019");
        fs::create_dir(&album).unwrap();
        let snapshot = DirectorySnapshot::read(&album).unwrap();
        assert_eq!(snapshot.dir_name(), Some("Summer 2019"));
        assert!(snapshot.is_empty());
    }
}
