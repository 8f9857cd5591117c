//! core::ledger
//!
//! The metadata ledger pass: slug assignment followed by validation.
//!
//! # Order
//!
//! 1. Build the slug allocator from the whole corpus
//! 2. Unless in check mode, assign slugs to documents with a table and a
//!    blank or missing slug, in discovery order
//! 3. Validate every document
//! 4. Check slug uniqueness across the corpus
//!
//! Assignment runs before validation so a freshly allocated slug is itself
//! subject to the format and uniqueness checks.

use serde::Serialize;

use crate::core::corpus::{Document, Exclusions};
use crate::core::issues::{Issue, IssueRecord};
use crate::core::slugs::SlugAllocator;
use crate::core::types::Slug;
use crate::core::validate::{duplicate_slugs, validate_document};

/// A slug written into a document during this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlugFix {
    /// Repository-relative document path.
    pub path: String,
    /// The assigned slug.
    pub slug: Slug,
}

impl SlugFix {
    /// The single-line diagnostic, e.g. `[FIX] Assigned slug 3 in docs/a.md`.
    pub fn diagnostic(&self) -> String {
        format!("[FIX] Assigned slug {} in {}", self.slug, self.path)
    }
}

/// Outcome of a ledger pass.
#[derive(Debug, Clone, Default)]
pub struct LedgerReport {
    /// Slugs assigned this run, in discovery order.
    pub fixes: Vec<SlugFix>,
    /// Per-document issues, in discovery order.
    pub document_issues: Vec<Issue>,
    /// Corpus-wide issues.
    pub corpus_issues: Vec<Issue>,
}

impl LedgerReport {
    /// Total number of issues.
    pub fn issue_count(&self) -> usize {
        self.document_issues.len() + self.corpus_issues.len()
    }

    /// Whether the corpus passed validation.
    pub fn is_ok(&self) -> bool {
        self.issue_count() == 0
    }

    /// Process exit code: zero on success, else the issue count clamped to 1..=255.
    pub fn exit_code(&self) -> u8 {
        self.issue_count().min(u8::MAX as usize) as u8
    }

    /// Every issue, per-document first.
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.document_issues.iter().chain(self.corpus_issues.iter())
    }

    /// The closing summary line.
    pub fn summary(&self) -> String {
        if self.is_ok() {
            let mut line = String::from("[OK] metadata validation passed");
            if !self.fixes.is_empty() {
                line.push_str(&format!("; updated {} file(s)", self.fixes.len()));
            }
            line
        } else {
            format!(
                "[FAIL] metadata validation failed with {} error(s)",
                self.issue_count()
            )
        }
    }

    /// Machine-readable form of the report.
    pub fn to_json(&self) -> serde_json::Value {
        let issues: Vec<IssueRecord> = self.issues().map(IssueRecord::from).collect();
        serde_json::json!({
            "ok": self.is_ok(),
            "issue_count": self.issue_count(),
            "fixes": self.fixes,
            "issues": issues,
        })
    }
}

/// Assign slugs to documents that have a table but no slug value.
///
/// Returns the fixes applied, in discovery order.
pub fn assign_missing_slugs(docs: &mut [Document], exclusions: &Exclusions) -> Vec<SlugFix> {
    let mut allocator = SlugAllocator::from_corpus(docs, exclusions);
    let mut fixes = Vec::new();
    for doc in docs.iter_mut() {
        if doc.table.is_none() || !doc.field("slug").trim().is_empty() {
            continue;
        }
        let slug = allocator.allocate();
        doc.set_field("slug", &slug.to_string());
        doc.assigned_slug = Some(slug);
        fixes.push(SlugFix {
            path: doc.display_path(),
            slug,
        });
    }
    fixes
}

/// Run the ledger pass over a loaded corpus.
///
/// Documents are mutated in place when slugs are assigned; persisting them
/// is left to the caller. In `check` mode nothing is mutated.
pub fn run(docs: &mut [Document], exclusions: &Exclusions, check: bool) -> LedgerReport {
    let fixes = if check {
        Vec::new()
    } else {
        assign_missing_slugs(docs, exclusions)
    };

    let mut document_issues = Vec::new();
    for doc in docs.iter_mut() {
        let path = doc.display_path();
        doc.issues = validate_document(doc, exclusions)
            .into_iter()
            .map(|kind| Issue::for_document(path.clone(), kind))
            .collect();
        document_issues.extend(doc.issues.iter().cloned());
    }

    let corpus_issues = duplicate_slugs(docs, exclusions);

    LedgerReport {
        fixes,
        document_issues,
        corpus_issues,
    }
}
