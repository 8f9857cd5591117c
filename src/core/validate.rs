//! core::validate
//!
//! Metadata validation.
//!
//! # Passes
//!
//! - **Document pass** ([`validate_document`]): every check runs
//!   independently and all findings are collected. A document without a
//!   table yields a single issue and no field-level checks.
//! - **Corpus pass** ([`duplicate_slugs`]): runs after every document has
//!   been parsed and reports each group of active documents sharing a slug.
//!
//! # Invariants
//!
//! - Never mutates documents
//! - Deterministic: issue order follows check order, then discovery order

use std::collections::BTreeMap;

use crate::core::corpus::{Document, Exclusions};
use crate::core::issues::{Issue, IssueKind};
use crate::core::table::{self, is_canonical_header, is_separator};
use crate::core::types::{Category, Slug, Status};

/// Fields every metadata table must carry with a non-blank value.
pub const REQUIRED_FIELDS: [&str; 5] = ["name", "slug", "status", "category", "editor"];

/// Run every per-document check.
pub fn validate_document(doc: &Document, exclusions: &Exclusions) -> Vec<IssueKind> {
    let Some(info) = &doc.table else {
        return vec![IssueKind::MalformedTable];
    };

    let mut issues = Vec::new();

    if !is_canonical_header(&doc.lines[info.start]) {
        issues.push(IssueKind::NonCanonicalHeader);
    }
    if !is_separator(&doc.lines[info.separator]) {
        issues.push(IssueKind::MalformedSeparator);
    }

    for idx in info.body() {
        let line = doc.lines[idx].trim();
        if !line.is_empty() && table::parse_row(line).is_none() {
            issues.push(IssueKind::MalformedRow {
                line: idx + 1,
                text: line.to_string(),
            });
        }
    }

    for field in REQUIRED_FIELDS {
        if doc.field(field).trim().is_empty() {
            issues.push(IssueKind::MissingField {
                field: field.to_string(),
            });
        }
    }

    let status = doc.field("status").trim().to_lowercase();
    let parsed_status = Status::parse(&status);
    if !status.is_empty() && parsed_status.is_none() {
        issues.push(IssueKind::InvalidStatus {
            value: status.clone(),
        });
    }

    if exclusions.is_deprecated(&doc.rel) && !parsed_status.is_some_and(|s| s.is_retired()) {
        issues.push(IssueKind::DeprecatedStatusMismatch {
            segment: exclusions.deprecated_segment.clone(),
        });
    }

    let slug = doc.field("slug").trim();
    if !slug.is_empty() && Slug::parse(slug).is_err() {
        issues.push(IssueKind::InvalidSlugFormat {
            value: slug.to_string(),
        });
    }

    let category = doc.field("category").trim();
    if !category.is_empty() && Category::parse(category).is_none() {
        issues.push(IssueKind::UnknownCategory {
            value: category.to_string(),
        });
    }

    issues
}

/// Report every slug shared by more than one active document.
///
/// Archived previous-version snapshots, documents without a table, and
/// malformed slugs are left out; the latter are reported per document.
pub fn duplicate_slugs(docs: &[Document], exclusions: &Exclusions) -> Vec<Issue> {
    let mut by_slug: BTreeMap<Slug, Vec<String>> = BTreeMap::new();
    for doc in docs {
        if doc.table.is_none() || exclusions.is_archived(&doc.rel) {
            continue;
        }
        if let Ok(slug) = Slug::parse(doc.field("slug").trim()) {
            by_slug.entry(slug).or_default().push(doc.display_path());
        }
    }

    by_slug
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(slug, paths)| Issue::corpus(IssueKind::DuplicateSlug { slug, paths }))
        .collect()
}
