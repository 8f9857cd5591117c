//! core::issues
//!
//! Known issue types reported by the metadata validator.
//!
//! # Architecture
//!
//! Every finding is a variant of [`IssueKind`]. Its `Display` output is the
//! human-readable diagnostic text, and [`IssueKind::code`] gives a stable
//! identifier for machine-readable reports.
//!
//! Issues never abort processing. They are accumulated per document (or
//! for the corpus as a whole) and reported together at the end of the run.

use serde::Serialize;
use thiserror::Error;

use crate::core::table::CANONICAL_HEADER;
use crate::core::types::{Category, Slug, Status};

/// Severity of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Counts toward the failure total.
    Error,
}

impl Severity {
    /// The single-line diagnostic prefix.
    pub fn tag(&self) -> &'static str {
        match self {
            Severity::Error => "[ERROR]",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Known validation findings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueKind {
    /// No metadata table could be located.
    #[error("missing metadata table '{}'", CANONICAL_HEADER)]
    MalformedTable,

    /// The header row matched loosely but is not the canonical text.
    #[error("metadata header row must be exactly '{}'", CANONICAL_HEADER)]
    NonCanonicalHeader,

    /// The separator row is not a valid markdown rule.
    #[error("metadata separator row is malformed")]
    MalformedSeparator,

    /// A row inside the table range fails the two-cell pattern.
    #[error("malformed metadata row at line {line}: {text}")]
    MalformedRow {
        /// One-based line number.
        line: usize,
        /// The offending line, trimmed.
        text: String,
    },

    /// A required field is absent or blank.
    #[error("missing required metadata field '{field}'")]
    MissingField {
        /// Lowercase field name.
        field: String,
    },

    /// Status is not one of the allowed values.
    #[error("invalid status '{value}' (allowed: {})", Status::allowed_list())]
    InvalidStatus {
        /// The lowercased status value.
        value: String,
    },

    /// Category is not one of the allowed values.
    #[error("unknown category '{value}' (expected one of: {})", Category::allowed_list())]
    UnknownCategory {
        /// The category value as written.
        value: String,
    },

    /// Document lives under a deprecated subtree with a live status.
    #[error("file is under '/{segment}/' but status is not deprecated/deleted")]
    DeprecatedStatusMismatch {
        /// The deprecated path segment.
        segment: String,
    },

    /// Slug is present but not a positive integer.
    #[error("slug must be a positive integer")]
    InvalidSlugFormat {
        /// The slug value as written.
        value: String,
    },

    /// Several active documents share one slug.
    #[error("duplicate slug {slug}: {}", .paths.join(", "))]
    DuplicateSlug {
        /// The shared slug.
        slug: Slug,
        /// Every offending document path, in discovery order.
        paths: Vec<String>,
    },
}

impl IssueKind {
    /// Stable identifier for this kind of issue.
    pub fn code(&self) -> &'static str {
        match self {
            IssueKind::MalformedTable => "malformed-table",
            IssueKind::NonCanonicalHeader => "non-canonical-header",
            IssueKind::MalformedSeparator => "malformed-separator",
            IssueKind::MalformedRow { .. } => "malformed-row",
            IssueKind::MissingField { .. } => "missing-field",
            IssueKind::InvalidStatus { .. } => "invalid-status",
            IssueKind::UnknownCategory { .. } => "unknown-category",
            IssueKind::DeprecatedStatusMismatch { .. } => "deprecated-status-mismatch",
            IssueKind::InvalidSlugFormat { .. } => "invalid-slug-format",
            IssueKind::DuplicateSlug { .. } => "duplicate-slug",
        }
    }

    /// Get the severity of this issue.
    pub fn severity(&self) -> Severity {
        Severity::Error
    }

    /// One-based line number this issue points at, when it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            IssueKind::MalformedRow { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// A reported issue, addressed to a document or to the whole corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// What was found.
    pub kind: IssueKind,
    /// Repository-relative document path; `None` for corpus-wide issues.
    pub path: Option<String>,
}

impl Issue {
    /// Create an issue for a single document.
    pub fn for_document(path: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            kind,
            path: Some(path.into()),
        }
    }

    /// Create a corpus-wide issue.
    pub fn corpus(kind: IssueKind) -> Self {
        Self { kind, path: None }
    }

    /// The single-line diagnostic, e.g. `[ERROR] docs/a.md: slug must be a positive integer`.
    pub fn diagnostic(&self) -> String {
        let tag = self.kind.severity().tag();
        match &self.path {
            Some(path) => format!("{tag} {path}: {}", self.kind),
            None => format!("{tag} {}", self.kind),
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.diagnostic())
    }
}

/// Machine-readable form of an [`Issue`].
#[derive(Debug, Clone, Serialize)]
pub struct IssueRecord {
    pub code: &'static str,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

impl From<&Issue> for IssueRecord {
    fn from(issue: &Issue) -> Self {
        Self {
            code: issue.kind.code(),
            severity: issue.kind.severity(),
            path: issue.path.clone(),
            line: issue.kind.line(),
            message: issue.kind.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_diagnostic_texts() {
        assert_eq!(
            IssueKind::MalformedTable.to_string(),
            "missing metadata table '| Field | Value |'"
        );
        assert_eq!(
            IssueKind::MissingField {
                field: "status".into()
            }
            .to_string(),
            "missing required metadata field 'status'"
        );
        assert_eq!(
            IssueKind::InvalidStatus {
                value: "final".into()
            }
            .to_string(),
            "invalid status 'final' (allowed: deleted, deprecated, draft, raw, stable)"
        );
        assert_eq!(
            IssueKind::DeprecatedStatusMismatch {
                segment: "deprecated".into()
            }
            .to_string(),
            "file is under '/deprecated/' but status is not deprecated/deleted"
        );
    }

    #[test]
    fn duplicate_lists_all_paths() {
        let kind = IssueKind::DuplicateSlug {
            slug: Slug::new(7).unwrap(),
            paths: vec!["docs/a.md".into(), "docs/b.md".into()],
        };
        assert_eq!(kind.to_string(), "duplicate slug 7: docs/a.md, docs/b.md");
    }

    #[test]
    fn diagnostic_prefixes() {
        let doc = Issue::for_document("docs/a.md", IssueKind::MalformedSeparator);
        assert_eq!(
            doc.diagnostic(),
            "[ERROR] docs/a.md: metadata separator row is malformed"
        );

        let corpus = Issue::corpus(IssueKind::DuplicateSlug {
            slug: Slug::new(2).unwrap(),
            paths: vec!["x.md".into(), "y.md".into()],
        });
        assert_eq!(corpus.diagnostic(), "[ERROR] duplicate slug 2: x.md, y.md");
    }

    #[test]
    fn record_carries_line() {
        let issue = Issue::for_document(
            "docs/a.md",
            IssueKind::MalformedRow {
                line: 8,
                text: "| broken".into(),
            },
        );
        let record = IssueRecord::from(&issue);
        assert_eq!(record.code, "malformed-row");
        assert_eq!(record.line, Some(8));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["severity"], "error");
        assert_eq!(json["path"], "docs/a.md");
    }
}
