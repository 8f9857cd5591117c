//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. History walks, blob reads and
//! remote lookups flow through this interface. No other module should import
//! `git2`, and nothing shells out to the git CLI.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Tracked-path resolution against the index
//! - Per-file history with rename following
//! - Historical blob reads and first-parent lookup
//! - Remote URL parsing
//!
//! # Invariants
//!
//! - Read-only: nothing here writes to the repository
//! - History is returned oldest first, each record carrying the path as it
//!   was named at that commit
//! - All operations return strong types (`CommitId`, `CommitRecord`)
//!
//! # Example
//!
//! ```ignore
//! use rfcledger::git::{Git, HistorySource};
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let path = git.resolve_tracked_path(Path::new("docs/raw/gossip.md"))?;
//! let history = git.history(&path)?;
//! if let Some(last) = history.last() {
//!     let text = git.blob_at(&last.id, &last.path)?;
//! }
//! ```

mod interface;
pub mod mock;

pub use interface::{CommitRecord, Git, GitError, HistorySource};
