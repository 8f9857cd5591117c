//! cli
//!
//! Command-line interface layer for rfcl.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve the working directory, repository root, and configuration
//! - Delegate to command handlers and map their outcome to an exit code
//!
//! # Architecture
//!
//! The CLI layer is thin. Document parsing, validation, and timeline
//! generation live in [`crate::core`] and [`crate::timeline`]; handlers only
//! load inputs, call into those modules, print, and persist.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::ui::output::Verbosity;

/// Per-invocation settings derived from global flags.
#[derive(Debug, Clone)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Output verbosity.
    pub verbosity: Verbosity,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            cwd: None,
            verbosity: Verbosity::Normal,
        }
    }
}

impl Context {
    /// The directory commands run in.
    pub fn cwd(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().context("Failed to determine current directory"),
        }
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse_args();

    let ctx = Context {
        cwd: cli.cwd.clone(),
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
    };

    commands::dispatch(cli.command, &ctx)
}
