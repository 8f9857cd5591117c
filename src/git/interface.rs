//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to all Git operations.
//! All history walks, blob reads, and remote lookups flow through this
//! interface, which returns structured results and normalizes errors into
//! typed failure categories.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::NotTracked`]: Path is not in the index
//! - [`GitError::QueryFailed`]: An underlying git2 call failed
//! - [`GitError::InvalidUtf8`]: Blob content is not valid UTF-8
//!
//! # Example
//!
//! ```ignore
//! use rfcledger::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let path = git.resolve_tracked_path(Path::new("docs/raw/gossip.md"))?;
//! for record in git.history(&path)? {
//!     println!("{} {} {}", record.date, record.id.short(7), record.subject);
//! }
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use thiserror::Error;

use crate::core::types::{CommitId, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Path is not known to version control.
    #[error("'{path}' is not tracked by git")]
    NotTracked {
        /// The path as given
        path: PathBuf,
    },

    /// A repository query failed.
    #[error("git query failed ({context}): {message}")]
    QueryFailed {
        /// What was being looked up
        context: String,
        /// The underlying error message
        message: String,
    },

    /// Blob content is not valid UTF-8.
    #[error("blob is not valid UTF-8: {path} at {commit}")]
    InvalidUtf8 {
        /// The commit that was read
        commit: String,
        /// The path within that commit
        path: String,
    },

    /// Invalid commit id format.
    #[error("invalid commit id: {message}")]
    InvalidCommitId {
        /// Description of the problem
        message: String,
    },
}

impl GitError {
    fn query(context: impl Into<String>, err: git2::Error) -> Self {
        GitError::QueryFailed {
            context: context.into(),
            message: err.message().to_string(),
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        GitError::InvalidCommitId {
            message: err.to_string(),
        }
    }
}

/// A single change to a path, as it appears in the file's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// The commit id
    pub id: CommitId,
    /// Author date, in the author's timezone
    pub date: NaiveDate,
    /// First paragraph of the commit message
    pub subject: String,
    /// The path as it was named at this commit
    pub path: String,
}

/// Read access to historical file content.
///
/// The fixed-point filter only needs these two lookups, so it is written
/// against this trait rather than against [`Git`] directly.
pub trait HistorySource {
    /// Content of `path` as of `commit`, or `None` if the path did not exist there.
    fn blob_at(&self, commit: &CommitId, path: &str) -> Result<Option<String>, GitError>;

    /// The first parent of `commit`, or `None` for a root commit.
    fn first_parent(&self, commit: &CommitId) -> Result<Option<CommitId>, GitError>;
}

/// The Git interface.
///
/// This is the **single point of interaction** with Git. No other module
/// imports `git2` directly.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
    /// Canonical working directory
    work_dir: PathBuf,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover` to find the repository root,
    /// so `path` can be any directory within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        let work_dir = repo.workdir().ok_or(GitError::BareRepo)?.to_path_buf();
        let work_dir = fs::canonicalize(&work_dir).unwrap_or(work_dir);

        Ok(Self { repo, work_dir })
    }

    /// Path to the working directory root.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    // =========================================================================
    // Path Resolution
    // =========================================================================

    /// Resolve a path to its repository-relative, `/`-separated form.
    ///
    /// Relative paths are taken relative to the working directory root.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotTracked`] if the path is outside the working tree
    ///   or not present in the index
    pub fn resolve_tracked_path(&self, path: &Path) -> Result<String, GitError> {
        let not_tracked = || GitError::NotTracked {
            path: path.to_path_buf(),
        };

        let candidate = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir.join(path)
        };
        let candidate = fs::canonicalize(&candidate).unwrap_or(candidate);
        let rel = candidate
            .strip_prefix(&self.work_dir)
            .map_err(|_| not_tracked())?;
        let rel = slash_path(rel);
        if rel.is_empty() {
            return Err(not_tracked());
        }

        let index = self
            .repo
            .index()
            .map_err(|e| GitError::query("index", e))?;
        if index.get_path(Path::new(&rel), 0).is_none() {
            return Err(not_tracked());
        }
        Ok(rel)
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Collect the commits that touched `path`, oldest first.
    ///
    /// Walks from HEAD in topological order and follows renames: when a
    /// commit introduces the tracked path by renaming another file, older
    /// commits are matched against the previous name. Merge commits whose
    /// content at the path equals any parent are skipped.
    ///
    /// Returns an empty list when the path has no history or the repository
    /// has no commits yet.
    pub fn history(&self, path: &str) -> Result<Vec<CommitRecord>, GitError> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                return Ok(Vec::new());
            }
            Err(e) => return Err(GitError::query("HEAD", e)),
        };
        let head = head
            .peel_to_commit()
            .map_err(|e| GitError::query("HEAD", e))?;

        let mut walk = self
            .repo
            .revwalk()
            .map_err(|e| GitError::query("revwalk", e))?;
        walk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
            .map_err(|e| GitError::query("revwalk", e))?;
        walk.push(head.id())
            .map_err(|e| GitError::query("revwalk", e))?;

        let mut tracked = path.to_string();
        let mut records = Vec::new();

        for oid in walk {
            let oid = oid.map_err(|e| GitError::query("revwalk", e))?;
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(|e| GitError::query(oid.to_string(), e))?;
            let tree = commit
                .tree()
                .map_err(|e| GitError::query(oid.to_string(), e))?;
            let current = entry_at(&tree, &tracked)?;

            let mut parent_trees = Vec::new();
            for parent in commit.parents() {
                parent_trees.push(
                    parent
                        .tree()
                        .map_err(|e| GitError::query(parent.id().to_string(), e))?,
                );
            }
            let parent_entries = parent_trees
                .iter()
                .map(|t| entry_at(t, &tracked))
                .collect::<Result<Vec<_>, _>>()?;

            let touched = if parent_entries.is_empty() {
                current.is_some()
            } else {
                parent_entries.iter().all(|entry| *entry != current)
            };
            if !touched {
                continue;
            }

            records.push(CommitRecord {
                id: CommitId::new(oid.to_string())?,
                date: author_date(&commit),
                subject: commit.summary().unwrap_or("").to_string(),
                path: tracked.clone(),
            });

            if current.is_some() && parent_entries.first() == Some(&None) {
                if let Some(old) = self.renamed_from(&parent_trees[0], &tree, &tracked)? {
                    tracked = old;
                }
            }
        }

        records.reverse();
        Ok(records)
    }

    /// If `path` in `tree` was produced by renaming a file from `parent`, the old name.
    fn renamed_from(
        &self,
        parent: &git2::Tree<'_>,
        tree: &git2::Tree<'_>,
        path: &str,
    ) -> Result<Option<String>, GitError> {
        let mut diff = self
            .repo
            .diff_tree_to_tree(Some(parent), Some(tree), None)
            .map_err(|e| GitError::query(path, e))?;
        let mut opts = git2::DiffFindOptions::new();
        opts.renames(true);
        diff.find_similar(Some(&mut opts))
            .map_err(|e| GitError::query(path, e))?;

        for delta in diff.deltas() {
            if delta.status() != git2::Delta::Renamed {
                continue;
            }
            if delta.new_file().path() == Some(Path::new(path)) {
                return Ok(delta.old_file().path().map(slash_path));
            }
        }
        Ok(None)
    }

    fn find_commit(&self, id: &CommitId) -> Result<git2::Commit<'_>, GitError> {
        let oid =
            git2::Oid::from_str(id.as_str()).map_err(|e| GitError::query(id.as_str(), e))?;
        self.repo
            .find_commit(oid)
            .map_err(|e| GitError::query(id.as_str(), e))
    }

    // =========================================================================
    // Remote Operations
    // =========================================================================

    /// Get the URL for a remote.
    ///
    /// Returns `None` if the remote doesn't exist.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>, GitError> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::query(format!("remote {name}"), e)),
        }
    }

    /// Web URL of the `origin` remote on GitHub, e.g. `https://github.com/org/rfcs`.
    ///
    /// Returns `None` when there is no origin or it is not a GitHub URL.
    pub fn web_base_url(&self) -> Result<Option<String>, GitError> {
        Ok(self
            .remote_url("origin")?
            .and_then(|url| Self::parse_github_remote(&url))
            .map(|(owner, repo)| format!("https://github.com/{owner}/{repo}")))
    }

    /// Parse a remote URL into owner/repo for GitHub.
    ///
    /// Handles both HTTPS and SSH URLs:
    /// - `https://github.com/owner/repo.git` -> `Some(("owner", "repo"))`
    /// - `git@github.com:owner/repo.git` -> `Some(("owner", "repo"))`
    ///
    /// Returns `None` for non-GitHub URLs.
    ///
    /// # Example
    ///
    /// ```
    /// use rfcledger::git::Git;
    ///
    /// assert_eq!(
    ///     Git::parse_github_remote("git@github.com:org/rfcs.git"),
    ///     Some(("org".to_string(), "rfcs".to_string()))
    /// );
    /// assert_eq!(Git::parse_github_remote("https://gitlab.com/org/rfcs.git"), None);
    /// ```
    pub fn parse_github_remote(url: &str) -> Option<(String, String)> {
        if let Some(rest) = url.strip_prefix("https://github.com/") {
            return Self::parse_owner_repo(rest);
        }

        if let Some(rest) = url.strip_prefix("git@github.com:") {
            return Self::parse_owner_repo(rest);
        }

        None
    }

    /// Parse "owner/repo.git" or "owner/repo" into (owner, repo).
    fn parse_owner_repo(path: &str) -> Option<(String, String)> {
        let path = path.trim_end_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let (owner, repo) = path.split_once('/')?;

        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }

        Some((owner.to_string(), repo.to_string()))
    }
}

impl HistorySource for Git {
    fn blob_at(&self, commit: &CommitId, path: &str) -> Result<Option<String>, GitError> {
        let commit_obj = self.find_commit(commit)?;
        let tree = commit_obj
            .tree()
            .map_err(|e| GitError::query(commit.as_str(), e))?;
        let Some(blob_id) = entry_at(&tree, path)? else {
            return Ok(None);
        };
        let blob = self
            .repo
            .find_blob(blob_id)
            .map_err(|e| GitError::query(path, e))?;
        String::from_utf8(blob.content().to_vec())
            .map(Some)
            .map_err(|_| GitError::InvalidUtf8 {
                commit: commit.to_string(),
                path: path.to_string(),
            })
    }

    fn first_parent(&self, commit: &CommitId) -> Result<Option<CommitId>, GitError> {
        let commit_obj = self.find_commit(commit)?;
        match commit_obj.parent_ids().next() {
            Some(parent) => Ok(Some(CommitId::new(parent.to_string())?)),
            None => Ok(None),
        }
    }
}

/// Blob id at `path` in `tree`, or `None` if absent or not a file.
fn entry_at(tree: &git2::Tree<'_>, path: &str) -> Result<Option<git2::Oid>, GitError> {
    match tree.get_path(Path::new(path)) {
        Ok(entry) if entry.kind() == Some(git2::ObjectType::Blob) => Ok(Some(entry.id())),
        Ok(_) => Ok(None),
        Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
        Err(e) => Err(GitError::query(path, e)),
    }
}

/// Author date of a commit in the author's own timezone.
fn author_date(commit: &git2::Commit<'_>) -> NaiveDate {
    let when = commit.author().when();
    let utc = DateTime::<Utc>::from_timestamp(when.seconds(), 0).unwrap_or_default();
    match FixedOffset::east_opt(when.offset_minutes() * 60) {
        Some(offset) => utc.with_timezone(&offset).date_naive(),
        None => utc.date_naive(),
    }
}

fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    mod git_error {
        use super::*;

        #[test]
        fn not_tracked_display() {
            let err = GitError::NotTracked {
                path: PathBuf::from("docs/a.md"),
            };
            assert_eq!(err.to_string(), "'docs/a.md' is not tracked by git");
        }

        #[test]
        fn type_error_converts() {
            let err: GitError = TypeError::InvalidCommitId("bad".into()).into();
            assert!(matches!(err, GitError::InvalidCommitId { .. }));
        }
    }

    mod parse_github_remote {
        use super::*;

        #[test]
        fn https_url() {
            assert_eq!(
                Git::parse_github_remote("https://github.com/owner/repo.git"),
                Some(("owner".to_string(), "repo".to_string()))
            );
        }

        #[test]
        fn https_url_without_git_suffix() {
            assert_eq!(
                Git::parse_github_remote("https://github.com/owner/repo"),
                Some(("owner".to_string(), "repo".to_string()))
            );
        }

        #[test]
        fn ssh_url() {
            assert_eq!(
                Git::parse_github_remote("git@github.com:owner/repo.git"),
                Some(("owner".to_string(), "repo".to_string()))
            );
        }

        #[test]
        fn non_github_returns_none() {
            assert_eq!(
                Git::parse_github_remote("https://gitlab.com/owner/repo.git"),
                None
            );
            assert_eq!(
                Git::parse_github_remote("git@gitlab.com:owner/repo.git"),
                None
            );
        }

        #[test]
        fn malformed_returns_none() {
            assert_eq!(Git::parse_github_remote("not-a-url"), None);
            assert_eq!(Git::parse_github_remote("https://github.com/"), None);
            assert_eq!(Git::parse_github_remote("https://github.com/owner"), None);
        }
    }

    #[test]
    fn slash_path_joins_components() {
        assert_eq!(slash_path(Path::new("docs/raw/a.md")), "docs/raw/a.md");
        assert_eq!(slash_path(Path::new("./docs/a.md")), "docs/a.md");
    }
}
