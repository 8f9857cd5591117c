//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves the repository root and configuration via [`Workspace`]
//! 2. Calls into the core or timeline modules
//! 3. Formats and displays output, then persists changed documents

mod completion;
mod timeline;
mod validate;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use timeline::timeline;
pub use validate::validate;

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::cli::args::Command;
use crate::cli::Context;
use crate::core::config::Config;
use crate::core::corpus::{self, Document, Exclusions};
use crate::git::Git;
use crate::ui::output;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<ExitCode> {
    match command {
        Command::Validate { check, json } => validate::validate(ctx, check, json),
        Command::Timeline { dry_run, paths } => timeline::timeline(ctx, dry_run, &paths),
        Command::Completion { shell } => {
            completion::completion(shell)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Repository root plus its resolved configuration.
#[derive(Debug)]
pub struct Workspace {
    /// Directory the docs root is relative to.
    pub root: PathBuf,
    /// Resolved configuration.
    pub config: Config,
}

impl Workspace {
    /// Resolve the workspace for `ctx`.
    ///
    /// The root is the enclosing git working tree if there is one, else the
    /// working directory itself. Config warnings are printed here.
    pub fn load(ctx: &Context) -> Result<Self> {
        let cwd = ctx.cwd()?;
        let root = match Git::open(&cwd) {
            Ok(git) => git.work_dir().to_path_buf(),
            Err(_) => cwd,
        };

        let loaded = Config::load(&root).context("Failed to load configuration")?;
        for warning in &loaded.warnings {
            output::warn(
                format!("{} ({})", warning.message, warning.path.display()),
                ctx.verbosity,
            );
        }
        if let Some(path) = loaded.config.loaded_from() {
            output::debug(format!("Config: {}", path.display()), ctx.verbosity);
        }

        Ok(Self {
            root,
            config: loaded.config,
        })
    }

    /// Exclusion rules from configuration.
    pub fn exclusions(&self) -> Exclusions {
        self.config.exclusions()
    }

    /// Discover candidate documents, sorted.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        corpus::discover(&self.root, self.config.docs_root(), &self.exclusions())
            .context("Failed to discover documents")
    }

    /// Load one document.
    pub fn load_document(&self, path: &Path) -> Result<Document> {
        Document::load(path, &self.root, self.config.scan_window())
            .with_context(|| format!("Failed to load {}", path.display()))
    }
}
