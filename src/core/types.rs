//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Title`] - Sanitized sidecar title, usable as one path component
//! - [`UtcTimestamp`] - Point in time applied to a primary path
//! - [`SourceKind`] - Sidecar document format
//! - [`Resolution`] - Which rule resolved a primary path
//! - [`MetadataRecord`] - A matched (metadata, primary) pair
//!
//! # Validation
//!
//! Titles are sanitized and validated at construction time, so a
//! [`MetadataRecord`] can never point at the containing directory's parent
//! through a crafted title.
//!
//! # Examples
//!
//! ```
//! use metafix::core::types::Title;
//!
//! let title = Title::new("Rock 'n' Roll/Live.jpg").unwrap();
//! assert_eq!(title.as_str(), "Rock _n_ Roll-Live.jpg");
//!
//! assert!(Title::new("..").is_err());
//! assert!(Title::new("").is_err());
//! ```

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use filetime::FileTime;
use serde::Serialize;
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid title: {0}")]
    InvalidTitle(String),
}

/// A sanitized sidecar title.
///
/// Export titles may carry characters that cannot appear in a file name.
/// Sanitization replaces `'` with `_` and `/` with `-`, matching how the
/// exporter names the primary files on disk.
///
/// # Invariants
///
/// - Never contains `/`
/// - Never empty, `.` or `..`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Title(String);

impl Title {
    /// Sanitize and validate a raw title.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidTitle` if the sanitized title does not name
    /// a child entry (empty, `.` or `..`).
    pub fn new(raw: &str) -> Result<Self, TypeError> {
        let sanitized = Self::sanitize(raw);
        match sanitized.as_str() {
            "" | "." | ".." => Err(TypeError::InvalidTitle(format!(
                "'{}' does not name a directory entry",
                raw
            ))),
            _ => Ok(Self(sanitized)),
        }
    }

    /// Apply the exporter's file name substitutions.
    pub fn sanitize(raw: &str) -> String {
        raw.replace('\'', "_").replace('/', "-")
    }

    /// Get the title as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.0
    }
}

/// Format of `last_modified_by_any_user` values in export metadata.
pub const EXPORT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// A UTC timestamp applied to a primary path.
///
/// # Example
///
/// ```
/// use metafix::core::types::UtcTimestamp;
///
/// let ts = UtcTimestamp::from_epoch_seconds(1_600_000_000.5).unwrap();
/// assert_eq!(ts.as_datetime().timestamp(), 1_600_000_000);
///
/// let parsed = UtcTimestamp::parse_export("2020-09-13T12:26:40.000000Z").unwrap();
/// assert_eq!(parsed.as_datetime().timestamp(), 1_600_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UtcTimestamp(DateTime<Utc>);

impl UtcTimestamp {
    /// Create a timestamp from fractional Unix epoch seconds.
    ///
    /// Returns `None` for non-finite or out-of-range values.
    pub fn from_epoch_seconds(seconds: f64) -> Option<Self> {
        if !seconds.is_finite() {
            return None;
        }
        let whole = seconds.floor();
        if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
            return None;
        }
        let nanos = ((seconds - whole) * 1_000_000_000.0) as u32;
        Utc.timestamp_opt(whole as i64, nanos.min(999_999_999))
            .single()
            .map(Self)
    }

    /// Parse an epoch value that may be a JSON number or a numeric string.
    pub fn from_epoch_value(value: &serde_json::Value) -> Option<Self> {
        let seconds = match value {
            serde_json::Value::Number(n) => n.as_f64()?,
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        Self::from_epoch_seconds(seconds)
    }

    /// Parse an ISO-8601 export timestamp with fractional seconds and a `Z` suffix.
    pub fn parse_export(value: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(value, EXPORT_DATETIME_FORMAT)
            .ok()
            .map(|naive| Self(Utc.from_utc_datetime(&naive)))
    }

    /// Get the underlying datetime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Convert to a filesystem time value.
    pub fn to_file_time(self) -> FileTime {
        FileTime::from_unix_time(self.0.timestamp(), self.0.timestamp_subsec_nanos())
    }
}

impl fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Sidecar document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Json,
    Html,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Json => f.write_str("json"),
            SourceKind::Html => f.write_str("html"),
        }
    }
}

/// How a record's primary path was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// A sibling entry named after the title.
    Sibling,
    /// The containing directory carries the title (album-level metadata).
    Album,
    /// Nothing matched; the primary path is the would-be sibling.
    Unmatched,
}

/// A matched (metadata, primary) pair.
///
/// Lives for one pass over one directory. The primary path is fixed once a
/// matcher produces the record.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
    /// Path to the sidecar file.
    pub metadata_path: PathBuf,
    /// Path the metadata applies to. May not exist for unmatched records.
    pub primary_path: PathBuf,
    /// Format of the sidecar.
    pub source_kind: SourceKind,
    /// Which rule produced `primary_path`.
    pub resolution: Resolution,
    /// Parsed document, kept for timestamp extraction at apply time.
    pub payload: Option<serde_json::Value>,
}

impl MetadataRecord {
    /// Whether the primary path came from the unmatched fallback.
    pub fn is_unmatched(&self) -> bool {
        self.resolution == Resolution::Unmatched
    }
}
