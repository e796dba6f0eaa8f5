//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All progress, error and debug output goes through this module so the
//! quiet, debug and JSON modes are handled in one place.

pub mod output;
