//! git::mock
//!
//! In-memory history for deterministic testing.
//!
//! # Design
//!
//! [`MemoryHistory`] implements [`HistorySource`] over a map of snapshots
//! keyed by commit and path. Commits can be marked as failing so tests can
//! exercise the error paths of callers without a real repository.
//!
//! # Example
//!
//! ```
//! use rfcledger::git::mock::MemoryHistory;
//! use rfcledger::git::HistorySource;
//!
//! let mut history = MemoryHistory::new();
//! let root = history.commit(None, &[("docs/a.md", "# A\n")]);
//! let next = history.commit(Some(&root), &[("docs/a.md", "# A\n\nMore.\n")]);
//!
//! assert_eq!(history.first_parent(&next).unwrap(), Some(root.clone()));
//! assert_eq!(history.blob_at(&root, "docs/a.md").unwrap().as_deref(), Some("# A\n"));
//! assert_eq!(history.blob_at(&root, "docs/b.md").unwrap(), None);
//! ```

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use super::interface::{CommitRecord, GitError, HistorySource};
use crate::core::types::CommitId;

/// In-memory commit graph with file snapshots.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    blobs: HashMap<(CommitId, String), String>,
    parents: HashMap<CommitId, Option<CommitId>>,
    failing: HashSet<CommitId>,
    next: u64,
}

impl MemoryHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic commit id for the n-th commit.
    pub fn id(n: u64) -> CommitId {
        // 40 hex digits is always a valid id
        match CommitId::new(format!("{n:040x}")) {
            Ok(id) => id,
            Err(_) => unreachable!("formatted id is 40 hex digits"),
        }
    }

    /// Record a commit with the given parent and file snapshots.
    ///
    /// Files not listed are absent at this commit.
    pub fn commit(&mut self, parent: Option<&CommitId>, files: &[(&str, &str)]) -> CommitId {
        self.next += 1;
        let id = Self::id(self.next);
        self.parents.insert(id.clone(), parent.cloned());
        for (path, text) in files {
            self.blobs
                .insert((id.clone(), (*path).to_string()), (*text).to_string());
        }
        id
    }

    /// Make every lookup involving `commit` fail.
    pub fn fail_on(&mut self, commit: &CommitId) {
        self.failing.insert(commit.clone());
    }

    /// A record for `commit` touching `path`, with a fixed date.
    pub fn record(commit: &CommitId, path: &str, subject: &str) -> CommitRecord {
        CommitRecord {
            id: commit.clone(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            subject: subject.to_string(),
            path: path.to_string(),
        }
    }

    fn check(&self, commit: &CommitId) -> Result<(), GitError> {
        if self.failing.contains(commit) {
            return Err(GitError::QueryFailed {
                context: commit.to_string(),
                message: "injected failure".to_string(),
            });
        }
        if !self.parents.contains_key(commit) {
            return Err(GitError::QueryFailed {
                context: commit.to_string(),
                message: "unknown commit".to_string(),
            });
        }
        Ok(())
    }
}

impl HistorySource for MemoryHistory {
    fn blob_at(&self, commit: &CommitId, path: &str) -> Result<Option<String>, GitError> {
        self.check(commit)?;
        Ok(self.blobs.get(&(commit.clone(), path.to_string())).cloned())
    }

    fn first_parent(&self, commit: &CommitId) -> Result<Option<CommitId>, GitError> {
        self.check(commit)?;
        Ok(self.parents.get(commit).cloned().flatten())
    }
}
