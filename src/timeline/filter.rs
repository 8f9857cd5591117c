//! timeline::filter
//!
//! Fixed-point filter: drops commits whose only effect was rewriting the
//! injected timeline block.
//!
//! # Why a fixed point
//!
//! Every regeneration commits a new timeline, and that commit would itself
//! show up in the next regeneration. To stop the history from growing on
//! every run, each commit's snapshot is compared with its first parent's
//! after removing the timeline block and normalizing blank lines. Equal
//! snapshots mean the commit only touched the timeline.
//!
//! # Invariants
//!
//! - Classification depends only on immutable historical blobs, never on the
//!   working tree, so a commit classified timeline-only stays that way
//! - Any lookup failure, missing parent, or missing blob keeps the commit

use std::sync::OnceLock;

use regex::Regex;

use crate::core::table::compiled;
use crate::git::{CommitRecord, HistorySource};

static BLOCK_RE: OnceLock<Regex> = OnceLock::new();
static BLANK_RUN_RE: OnceLock<Regex> = OnceLock::new();

/// Strip the timeline block and normalize blank-line runs.
///
/// Only the first block is removed. Two or more consecutive blank lines
/// collapse to one, and trailing whitespace at the end is trimmed.
///
/// # Example
///
/// ```
/// use rfcledger::timeline::filter::normalize;
///
/// let text = "# A\n\n<!-- timeline:start -->\n\nold\n\n<!-- timeline:end -->\n\nBody\n";
/// assert_eq!(normalize(text), "# A\n\nBody");
/// ```
pub fn normalize(text: &str) -> String {
    let block = compiled(
        &BLOCK_RE,
        r"(?s)<!-- timeline:start -->.*?<!-- timeline:end -->",
    );
    let stripped = block.replacen(text, 1, "");
    let blank_runs = compiled(&BLANK_RUN_RE, r"\n(?:[ \t]*\n){2,}");
    blank_runs
        .replace_all(&stripped, "\n\n")
        .trim_end()
        .to_string()
}

/// Whether two snapshots differ only in their timeline block.
pub fn is_timeline_only(current: &str, parent: &str) -> bool {
    normalize(current) == normalize(parent)
}

/// Whether `record` should be dropped from the rendered history.
///
/// Returns `false` whenever the answer cannot be established.
pub fn should_drop<S: HistorySource + ?Sized>(source: &S, record: &CommitRecord) -> bool {
    let Ok(Some(parent)) = source.first_parent(&record.id) else {
        return false;
    };
    let Ok(Some(current)) = source.blob_at(&record.id, &record.path) else {
        return false;
    };
    let Ok(Some(previous)) = source.blob_at(&parent, &record.path) else {
        return false;
    };
    is_timeline_only(&current, &previous)
}

/// Keep every commit that is not timeline-only, preserving order.
pub fn filter_history<S: HistorySource + ?Sized>(
    source: &S,
    commits: Vec<CommitRecord>,
) -> Vec<CommitRecord> {
    commits
        .into_iter()
        .filter(|record| !should_drop(source, record))
        .collect()
}
