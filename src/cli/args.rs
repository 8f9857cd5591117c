//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Errors and summaries only

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// rfcl - Metadata ledger and timeline generator for RFC documents
#[derive(Parser, Debug)]
#[command(name = "rfcl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if rfcl was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true, conflicts_with = "debug")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate document metadata and assign missing slugs
    #[command(
        name = "validate",
        long_about = "Validate the metadata table of every document.\n\n\
            Each document must carry a '| Field | Value |' table with a name, slug, \
            status, category and editor. Slugs must be positive integers and unique \
            across the corpus; archived previous-version snapshots are exempt.\n\n\
            Unless --check is given, documents that have a table but no slug are \
            assigned the smallest unused slug before validation runs.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Validate and fill in missing slugs
    rfcl validate

    # Read-only check for CI
    rfcl validate --check

    # Machine-readable report
    rfcl validate --check --json

EXIT STATUS:
    0 when no issues are found, otherwise the number of issues (at most 255)."
    )]
    Validate {
        /// Report only; do not assign missing slugs
        #[arg(long)]
        check: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Regenerate the timeline block of each document
    #[command(
        name = "timeline",
        long_about = "Regenerate the commit timeline of each document.\n\n\
            The history of every RFC document is read from git, following renames. \
            Commits that only rewrote the timeline block itself are left out, so \
            running this repeatedly converges instead of growing the timeline.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Update every document under the docs root
    rfcl timeline

    # Preview which documents would change
    rfcl timeline --dry-run

    # Update specific documents
    rfcl timeline docs/raw/gossip.md"
    )]
    Timeline {
        /// Show what would change without writing files
        #[arg(long)]
        dry_run: bool,

        /// Documents to update (default: all RFC documents under the docs root)
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash
    rfcl completion bash > ~/.local/share/bash-completion/completions/rfcl

    # Zsh
    rfcl completion zsh > ~/.zfunc/_rfcl"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
