//! core
//!
//! Core domain types and filesystem operations for metafix.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Title, UtcTimestamp, MetadataRecord
//! - [`config`] - Run configuration and startup preconditions
//! - [`walk`] - Post-order directory traversal and directory snapshots
//! - [`relocate`] - Moving sidecars into a mirrored destination tree

pub mod config;
pub mod relocate;
pub mod types;
pub mod walk;
