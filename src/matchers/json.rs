//! matchers::json
//!
//! JSON sidecars (`<name>.json`).
//!
//! # Title
//!
//! Taken from the top-level `title`, falling back to `albumData.title`.
//! Resolution tries a sibling of that name, then the containing directory
//! (album-level metadata), then the unmatched fallback.
//!
//! # Timestamp
//!
//! Export eras store the capture time in different places. The first field
//! that yields a usable value wins; a malformed field is skipped:
//!
//! 1. `last_modified_by_any_user` - `2021-03-04T05:06:07.123456Z`
//! 2. `photoTakenTime.timestamp` - epoch seconds, number or string
//! 3. `date.timestamp`
//! 4. `albumData.date.timestamp`

use std::fs;
use std::path::Path;

use filetime::set_file_times;
use serde_json::Value;

use super::{resolve_primary, Applied, ApplyError};
use crate::core::config::MatchPolicy;
use crate::core::types::{MetadataRecord, SourceKind, Title, UtcTimestamp};
use crate::core::walk::DirectorySnapshot;

pub const SUFFIXES: &[&str] = &[".json"];

/// JSON pointers tried for the title, in priority order.
const TITLE_POINTERS: &[&str] = &["/title", "/albumData/title"];

/// JSON pointers holding epoch seconds, in priority order after
/// `last_modified_by_any_user`.
const EPOCH_POINTERS: &[&str] = &[
    "/photoTakenTime/timestamp",
    "/date/timestamp",
    "/albumData/date/timestamp",
];

pub fn attempt_match(
    metadata_path: &Path,
    snapshot: &DirectorySnapshot,
    policy: &MatchPolicy,
) -> Option<MetadataRecord> {
    let text = fs::read_to_string(metadata_path).ok()?;
    let payload: Value = serde_json::from_str(&text).ok()?;
    if payload.is_null() {
        return None;
    }

    let title = extract_title(&payload)?;
    let (primary_path, resolution) = resolve_primary(&title, snapshot, policy, true)?;

    Some(MetadataRecord {
        metadata_path: metadata_path.to_path_buf(),
        primary_path,
        source_kind: SourceKind::Json,
        resolution,
        payload: Some(payload),
    })
}

/// The sanitized title of a sidecar document.
pub fn extract_title(payload: &Value) -> Option<Title> {
    TITLE_POINTERS
        .iter()
        .filter_map(|pointer| payload.pointer(pointer).and_then(Value::as_str))
        .find_map(|raw| Title::new(raw).ok())
}

/// The capture time of a sidecar document.
pub fn extract_timestamp(payload: &Value) -> Option<UtcTimestamp> {
    let modified = payload
        .get("last_modified_by_any_user")
        .and_then(Value::as_str)
        .and_then(UtcTimestamp::parse_export);
    if modified.is_some() {
        return modified;
    }

    EPOCH_POINTERS
        .iter()
        .filter_map(|pointer| payload.pointer(pointer))
        .find_map(UtcTimestamp::from_epoch_value)
}

pub fn apply(record: &MetadataRecord, dry_run: bool) -> Result<Applied, ApplyError> {
    if !record.primary_path.exists() {
        return Err(ApplyError::PrimaryMissing(record.primary_path.clone()));
    }

    let timestamp = record
        .payload
        .as_ref()
        .and_then(extract_timestamp)
        .ok_or_else(|| ApplyError::NoTimestamp(record.metadata_path.clone()))?;

    if !dry_run {
        let time = timestamp.to_file_time();
        set_file_times(&record.primary_path, time, time).map_err(|source| ApplyError::Io {
            path: record.primary_path.clone(),
            source,
        })?;
    }

    Ok(Applied::Timestamp(timestamp))
}
