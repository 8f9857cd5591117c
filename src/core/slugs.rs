//! core::slugs
//!
//! Slug allocation across the corpus.
//!
//! # Algorithm
//!
//! The allocator is built once per run from a corpus scan. It records every
//! well-formed slug in use by an active document (archived previous-version
//! snapshots are ignored) and hands out the smallest positive integer not in
//! that set. Each allocated slug is recorded immediately, so two documents
//! needing a slug in the same run never receive the same one.
//!
//! Allocation is order-sensitive: callers must visit documents in discovery
//! order for the result to be deterministic. Once the assigned slugs are
//! persisted, a second run finds nothing to allocate.

use std::collections::BTreeSet;

use crate::core::corpus::{Document, Exclusions};
use crate::core::types::Slug;

/// Hands out unused slugs.
#[derive(Debug, Clone, Default)]
pub struct SlugAllocator {
    used: BTreeSet<Slug>,
}

impl SlugAllocator {
    /// Create an allocator over an explicit used-set.
    pub fn new(used: impl IntoIterator<Item = Slug>) -> Self {
        Self {
            used: used.into_iter().collect(),
        }
    }

    /// Collect used slugs from the corpus.
    ///
    /// Documents without a table, with a malformed slug, or under an
    /// archived snapshot path do not contribute.
    pub fn from_corpus(docs: &[Document], exclusions: &Exclusions) -> Self {
        let used = docs
            .iter()
            .filter(|doc| doc.table.is_some())
            .filter(|doc| !exclusions.is_archived(&doc.rel))
            .filter_map(|doc| Slug::parse(doc.field("slug").trim()).ok());
        Self::new(used)
    }

    /// Allocate the smallest unused slug and mark it used.
    ///
    /// # Example
    ///
    /// ```
    /// use rfcledger::core::slugs::SlugAllocator;
    /// use rfcledger::core::types::Slug;
    ///
    /// let used = [1, 2, 4].map(|n| Slug::new(n).unwrap());
    /// let mut allocator = SlugAllocator::new(used);
    /// assert_eq!(allocator.allocate().get(), 3);
    /// assert_eq!(allocator.allocate().get(), 5);
    /// ```
    pub fn allocate(&mut self) -> Slug {
        let mut candidate = Slug::first();
        // used is sorted, so the first gap is the answer
        for slug in &self.used {
            if *slug != candidate {
                break;
            }
            match candidate.next() {
                Some(next) => candidate = next,
                None => break,
            }
        }
        self.used.insert(candidate);
        candidate
    }

    /// Whether a slug is already taken.
    pub fn is_used(&self, slug: Slug) -> bool {
        self.used.contains(&slug)
    }

    /// All slugs currently taken, ascending.
    pub fn used(&self) -> impl Iterator<Item = Slug> + '_ {
        self.used.iter().copied()
    }
}
