//! core::corpus
//!
//! Document discovery and the in-memory document model.
//!
//! # Lifecycle
//!
//! Documents are discovered once at process start, loaded into memory,
//! mutated in place by the slug allocator or the timeline injector, and
//! written back only when their rendered text differs from what was read.
//!
//! # Exclusions
//!
//! [`Exclusions`] is plain data built from configuration and passed into
//! discovery and validation. Excluded file names never become documents.
//! Archived snapshots (paths containing the archive segment) are still
//! documents but are ignored for slug allocation and uniqueness.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::core::issues::Issue;
use crate::core::table::{self, TableInfo, CANONICAL_HEADER};
use crate::core::types::Slug;

/// Errors from corpus operations.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read document '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write document '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to walk '{path}': {message}")]
    WalkError { path: PathBuf, message: String },
}

/// Static exclusion rules for discovery and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusions {
    /// File names that are never documents.
    pub files: BTreeSet<String>,
    /// Path segment marking archived previous-version snapshots.
    pub archive_segment: String,
    /// Path segment marking deprecated documents.
    pub deprecated_segment: String,
}

impl Default for Exclusions {
    fn default() -> Self {
        crate::core::config::Config::default().exclusions()
    }
}

impl Exclusions {
    /// Whether the file name alone excludes this path.
    pub fn is_excluded_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.files.contains(name))
    }

    /// Whether the path lies under an archived snapshot subtree.
    pub fn is_archived(&self, rel: &Path) -> bool {
        has_segment(rel, &self.archive_segment)
    }

    /// Whether the path lies under a deprecated subtree.
    pub fn is_deprecated(&self, rel: &Path) -> bool {
        has_segment(rel, &self.deprecated_segment)
    }
}

fn has_segment(path: &Path, segment: &str) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == segment))
}

/// Render a relative path with forward slashes for diagnostics.
pub fn display_path(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Discover candidate documents under `repo_root/docs_root`.
///
/// Returns absolute paths of every `*.md` file whose name is not excluded,
/// sorted for a deterministic processing order. A missing docs root yields
/// an empty list.
pub fn discover(
    repo_root: &Path,
    docs_root: &str,
    exclusions: &Exclusions,
) -> Result<Vec<PathBuf>, CorpusError> {
    let root = repo_root.join(docs_root);
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&root) {
        let entry = entry.map_err(|e| CorpusError::WalkError {
            path: root.clone(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
            continue;
        }
        if exclusions.is_excluded_file(path) {
            continue;
        }
        files.push(path.to_path_buf());
    }
    files.sort();
    Ok(files)
}

/// Whether text looks like an RFC document: a top-level heading and a metadata header.
pub fn looks_like_rfc(text: &str) -> bool {
    text.contains("# ") && text.contains(CANONICAL_HEADER)
}

/// A document loaded into memory.
#[derive(Debug, Clone)]
pub struct Document {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Repository-relative path.
    pub rel: PathBuf,
    /// Text split into lines, without terminators.
    pub lines: Vec<String>,
    /// The located metadata table, if any.
    pub table: Option<TableInfo>,
    /// Issues found by the validator.
    pub issues: Vec<Issue>,
    /// Slug assigned during this run.
    pub assigned_slug: Option<Slug>,
    original: String,
}

impl Document {
    /// Load a document from disk.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    pub fn load(path: &Path, repo_root: &Path, scan_window: usize) -> Result<Self, CorpusError> {
        let bytes = fs::read(path).map_err(|e| CorpusError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let rel = path.strip_prefix(repo_root).unwrap_or(path).to_path_buf();
        Ok(Self::from_text(path.to_path_buf(), rel, text, scan_window))
    }

    /// Build a document from text already in memory.
    pub fn from_text(path: PathBuf, rel: PathBuf, text: String, scan_window: usize) -> Self {
        let lines: Vec<String> = text.lines().map(String::from).collect();
        let table = table::locate_within(&lines, scan_window);
        Self {
            path,
            rel,
            lines,
            table,
            issues: Vec::new(),
            assigned_slug: None,
            original: text,
        }
    }

    /// Repository-relative path with forward slashes.
    pub fn display_path(&self) -> String {
        display_path(&self.rel)
    }

    /// Look up a metadata value; empty when there is no table or no such field.
    pub fn field(&self, name: &str) -> &str {
        self.table
            .as_ref()
            .and_then(|t| t.get(name))
            .unwrap_or("")
    }

    /// Set a metadata field and re-locate the table.
    ///
    /// Does nothing when the document has no table.
    pub fn set_field(&mut self, name: &str, value: &str) {
        if let Some(table) = self.table.take() {
            self.table = table.set_field(&mut self.lines, name, value);
        }
    }

    /// The document text as it would be written back.
    ///
    /// Trailing whitespace is trimmed and a single final newline appended.
    pub fn render(&self) -> String {
        let mut text = self.lines.join("\n").trim_end().to_string();
        text.push('\n');
        text
    }

    /// Whether the in-memory lines differ from what was loaded.
    pub fn is_modified(&self) -> bool {
        self.lines.iter().map(String::as_str).ne(self.original.lines())
    }

    /// Write the document back if it changed. Returns whether a write happened.
    pub fn save(&self) -> Result<bool, CorpusError> {
        if !self.is_modified() {
            return Ok(false);
        }
        fs::write(&self.path, self.render()).map_err(|e| CorpusError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn doc(rel: &str, text: &str) -> Document {
        Document::from_text(
            PathBuf::from("/repo").join(rel),
            PathBuf::from(rel),
            text.to_string(),
            table::DEFAULT_SCAN_WINDOW,
        )
    }

    mod exclusions {
        use super::*;

        #[test]
        fn excluded_file_names() {
            let rules = Exclusions::default();
            assert!(rules.is_excluded_file(Path::new("docs/README.md")));
            assert!(rules.is_excluded_file(Path::new("docs/raw/template.md")));
            assert!(!rules.is_excluded_file(Path::new("docs/raw/readme-notes.md")));
        }

        #[test]
        fn segments_match_whole_components() {
            let rules = Exclusions::default();
            assert!(rules.is_archived(Path::new("docs/previous-versions/12/v1.md")));
            assert!(!rules.is_archived(Path::new("docs/previous-versions-notes.md")));
            assert!(rules.is_deprecated(Path::new("docs/deprecated/x.md")));
            assert!(!rules.is_deprecated(Path::new("docs/deprecated.md")));
        }
    }

    mod discovery {
        use super::*;

        #[test]
        fn finds_sorted_markdown_files() {
            let temp = TempDir::new().unwrap();
            let docs = temp.path().join("docs");
            fs::create_dir_all(docs.join("raw")).unwrap();
            fs::write(docs.join("raw/b.md"), "b").unwrap();
            fs::write(docs.join("a.md"), "a").unwrap();
            fs::write(docs.join("SUMMARY.md"), "s").unwrap();
            fs::write(docs.join("notes.txt"), "n").unwrap();

            let files = discover(temp.path(), "docs", &Exclusions::default()).unwrap();
            let rel: Vec<_> = files
                .iter()
                .map(|p| display_path(p.strip_prefix(temp.path()).unwrap()))
                .collect();
            assert_eq!(rel, vec!["docs/a.md", "docs/raw/b.md"]);
        }

        #[test]
        fn missing_root_is_empty() {
            let temp = TempDir::new().unwrap();
            let files = discover(temp.path(), "docs", &Exclusions::default()).unwrap();
            assert!(files.is_empty());
        }
    }

    mod document {
        use super::*;

        #[test]
        fn rfc_detection() {
            assert!(looks_like_rfc("# Title\n\n| Field | Value |\n"));
            assert!(!looks_like_rfc("# Title only\n"));
            assert!(!looks_like_rfc("| Field | Value |\n"));
        }

        #[test]
        fn field_lookup_without_table() {
            let d = doc("docs/a.md", "# A\n");
            assert!(d.table.is_none());
            assert_eq!(d.field("slug"), "");
        }

        #[test]
        fn unmodified_document_is_not_saved() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("a.md");
            fs::write(&path, "# A\n\n| Field | Value |\n|---|---|\n| Slug | 1 |\n").unwrap();

            let d = Document::load(&path, temp.path(), 140).unwrap();
            assert_eq!(d.display_path(), "a.md");
            assert!(!d.is_modified());
            assert!(!d.save().unwrap());
        }

        #[test]
        fn set_field_marks_modified_and_saves() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("a.md");
            fs::write(&path, "# A\n\n| Field | Value |\n|---|---|\n| Name | A |\n").unwrap();

            let mut d = Document::load(&path, temp.path(), 140).unwrap();
            d.set_field("slug", "5");
            assert!(d.is_modified());
            assert_eq!(d.field("slug"), "5");
            assert!(d.save().unwrap());

            let written = fs::read_to_string(&path).unwrap();
            assert_eq!(
                written,
                "# A\n\n| Field | Value |\n|---|---|\n| Name | A |\n| Slug | 5 |\n"
            );
        }
    }
}
