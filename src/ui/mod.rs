//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Severity-prefixed diagnostics and verbosity handling
//!
//! # Design
//!
//! All progress and diagnostic output goes through this module so that the
//! quiet and debug flags are honored consistently by every command.

pub mod output;
