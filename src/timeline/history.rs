//! timeline::history
//!
//! Per-file history extraction: the raw log walk followed by the
//! fixed-point filter.

use crate::git::{CommitRecord, Git, GitError};
use crate::timeline::filter::filter_history;

/// The history of one document, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHistory {
    /// Repository-relative path of the document.
    pub path: String,
    /// Retained commits, oldest first.
    pub commits: Vec<CommitRecord>,
    /// Number of timeline-only commits dropped.
    pub dropped: usize,
}

impl FileHistory {
    /// Whether nothing is left to render.
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// Walk the history of `path` and drop timeline-only commits.
///
/// # Errors
///
/// Any failure of the history walk itself is returned. Failures while
/// classifying individual commits are not errors; those commits are kept.
pub fn extract(git: &Git, path: &str) -> Result<FileHistory, GitError> {
    let all = git.history(path)?;
    let total = all.len();
    let commits = filter_history(git, all);
    Ok(FileHistory {
        path: path.to_string(),
        dropped: total - commits.len(),
        commits,
    })
}
