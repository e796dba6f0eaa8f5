//! matchers::html
//!
//! HTML comment sidecars (`<name>.html`).
//!
//! These files carry no timestamp, only the title of the file they belong
//! to, read from the `<title>` that is a direct child of `<html>`. Applying
//! one confirms the primary still exists and mutates nothing.

use std::fs;
use std::path::Path;

use html_escape::decode_html_entities;
use lol_html::{text, HtmlRewriter, Settings};

use super::{resolve_primary, Applied, ApplyError};
use crate::core::config::MatchPolicy;
use crate::core::types::{MetadataRecord, SourceKind, Title};
use crate::core::walk::DirectorySnapshot;

pub const SUFFIXES: &[&str] = &[".html"];

const TITLE_SELECTOR: &str = "html > title";

pub fn attempt_match(
    metadata_path: &Path,
    snapshot: &DirectorySnapshot,
    policy: &MatchPolicy,
) -> Option<MetadataRecord> {
    let markup = fs::read_to_string(metadata_path).ok()?;
    let raw = extract_title(&markup)?;
    let title = Title::new(&raw).ok()?;
    let (primary_path, resolution) = resolve_primary(&title, snapshot, policy, false)?;

    Some(MetadataRecord {
        metadata_path: metadata_path.to_path_buf(),
        primary_path,
        source_kind: SourceKind::Html,
        resolution,
        payload: None,
    })
}

/// Text of the `html > title` element, entities decoded.
///
/// Returns `None` when there is no such element or the markup cannot be
/// processed.
pub fn extract_title(markup: &str) -> Option<String> {
    let mut title: Option<String> = None;

    {
        let mut rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![text!(TITLE_SELECTOR, |chunk| {
                    title.get_or_insert_with(String::new).push_str(chunk.as_str());
                    Ok(())
                })],
                ..Settings::default()
            },
            |_: &[u8]| {},
        );
        rewriter.write(markup.as_bytes()).ok()?;
        rewriter.end().ok()?;
    }

    title.map(|raw| decode_html_entities(&raw).into_owned())
}

pub fn apply(record: &MetadataRecord) -> Result<Applied, ApplyError> {
    if record.primary_path.exists() {
        Ok(Applied::Verified)
    } else {
        Err(ApplyError::PrimaryMissing(record.primary_path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Resolution;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn comments(title: &str) -> String {
        format!(
            "<html><title>{title}</title><body><div class=\"comment\">nice</div></body></html>"
        )
    }

    mod title {
        use super::*;

        #[test]
        fn reads_direct_child_title() {
            assert_eq!(extract_title(&comments("IMG_1.jpg")), Some("IMG_1.jpg".into()));
        }

        #[test]
        fn ignores_nested_titles() {
            let markup = "<html><head><title>nested.jpg</title></head></html>";
            assert_eq!(extract_title(markup), None);

            let markup = "<html><body><svg><title>icon</title></svg></body></html>";
            assert_eq!(extract_title(markup), None);
        }

        #[test]
        fn decodes_entities() {
            assert_eq!(
                extract_title(&comments("Tom &amp; Jerry.jpg")),
                Some("Tom & Jerry.jpg".into())
            );
        }

        #[test]
        fn missing_title() {
            assert_eq!(extract_title("<html><body>hi</body></html>"), None);
            assert_eq!(extract_title(""), None);
        }
    }

    #[test]
    fn matches_sibling_by_title() {
        let tmp = TempDir::new().unwrap();
        let photo = write(tmp.path(), "IMG_1.jpg", "");
        let sidecar = write(tmp.path(), "IMG_1.jpg.html", &comments("IMG_1.jpg"));
        let snapshot = DirectorySnapshot::read(tmp.path()).unwrap();

        let record = attempt_match(&sidecar, &snapshot, &MatchPolicy::default()).unwrap();
        assert_eq!(record.primary_path, photo);
        assert_eq!(record.source_kind, SourceKind::Html);
        assert_eq!(record.resolution, Resolution::Sibling);
        assert!(record.payload.is_none());
    }

    #[test]
    fn does_not_match_containing_directory() {
        let tmp = TempDir::new().unwrap();
        let album = tmp.path().join("Album");
        fs::create_dir(&album).unwrap();
        let sidecar = write(&album, "comments.html", &comments("Album"));
        let snapshot = DirectorySnapshot::read(&album).unwrap();

        assert!(attempt_match(&sidecar, &snapshot, &MatchPolicy::default()).is_none());
    }

    #[test]
    fn unmatched_policy() {
        let tmp = TempDir::new().unwrap();
        let sidecar = write(tmp.path(), "c.html", &comments("missing.jpg"));
        let snapshot = DirectorySnapshot::read(tmp.path()).unwrap();
        let policy = MatchPolicy {
            allow_unmatched_primary: true,
        };

        assert!(attempt_match(&sidecar, &snapshot, &MatchPolicy::default()).is_none());
        let record = attempt_match(&sidecar, &snapshot, &policy).unwrap();
        assert!(record.is_unmatched());
        assert_eq!(record.primary_path, tmp.path().join("missing.jpg"));
    }

    #[test]
    fn apply_only_checks_existence() {
        let tmp = TempDir::new().unwrap();
        let photo = write(tmp.path(), "IMG_1.jpg", "");
        let before = fs::metadata(&photo).unwrap().modified().unwrap();
        let record = MetadataRecord {
            metadata_path: tmp.path().join("IMG_1.jpg.html"),
            primary_path: photo.clone(),
            source_kind: SourceKind::Html,
            resolution: Resolution::Sibling,
            payload: None,
        };

        assert_eq!(apply(&record).unwrap(), Applied::Verified);
        assert_eq!(fs::metadata(&photo).unwrap().modified().unwrap(), before);

        fs::remove_file(&photo).unwrap();
        assert!(matches!(apply(&record), Err(ApplyError::PrimaryMissing(_))));
    }
}
