//! metafix - Restore timestamps of exported photo archives
//!
//! Photo exports (Google Takeout and similar) keep capture times and
//! original titles in sidecar files next to the media: `<name>.json`
//! documents and `<name>.html` comment pages. metafix walks an export tree,
//! matches every sidecar to the file or album directory it describes, sets
//! that path's access and modify times from the sidecar, and optionally
//! moves the sidecars into a separate tree that mirrors the source.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Runs Walk → Snapshot → Match → Apply → Relocate per directory
//! - [`core`] - Domain types, configuration, traversal and relocation
//! - [`matchers`] - JSON and HTML sidecar matchers
//! - [`ui`] - Output utilities
//!
//! # Guarantees
//!
//! 1. A sidecar produces at most one record per run
//! 2. Malformed sidecars are skipped, never fatal
//! 3. A failure on one sidecar never stops the run
//! 4. Invalid argument combinations fail before the tree is touched

pub mod cli;
pub mod core;
pub mod engine;
pub mod matchers;
pub mod ui;
