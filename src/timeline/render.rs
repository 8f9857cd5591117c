//! timeline::render
//!
//! Markdown rendering of a file's history.
//!
//! # Format
//!
//! ```text
//! ## Timeline
//!
//! - **2024-03-02** — [`3f2a9c1`](https://github.com/org/rfcs/blob/<id>/docs/raw/a.md) — Tighten wording
//! - **2024-01-15** — [`0b71d4e`](https://github.com/org/rfcs/blob/<id>/docs/a.md) — Add draft
//! ```
//!
//! Entries are newest first. Each link points at the file as named at that
//! commit, so links survive renames.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::core::table::compiled;
use crate::git::CommitRecord;

/// Heading that opens the rendered timeline.
pub const HEADING: &str = "## Timeline";

/// Length of the abbreviated commit id shown in each entry.
pub const SHORT_ID_LEN: usize = 7;

static ENTRY_RE: OnceLock<Regex> = OnceLock::new();

/// The visible part of one rendered entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub date: NaiveDate,
    pub short_id: String,
    pub subject: String,
}

/// Render one entry line.
pub fn entry(base_url: &str, record: &CommitRecord) -> String {
    format!(
        "- **{}** — [`{}`]({}/blob/{}/{}) — {}",
        record.date.format("%Y-%m-%d"),
        record.id.short(SHORT_ID_LEN),
        base_url.trim_end_matches('/'),
        record.id,
        record.path,
        record.subject
    )
}

/// Render a chronological (oldest first) history, newest entry on top.
///
/// The output ends with exactly one newline.
pub fn render(base_url: &str, commits: &[CommitRecord]) -> String {
    let mut lines = vec![HEADING.to_string(), String::new()];
    lines.extend(commits.iter().rev().map(|record| entry(base_url, record)));
    let mut markdown = lines.join("\n").trim_end().to_string();
    markdown.push('\n');
    markdown
}

/// Recover the visible entries from rendered markdown, in document order.
///
/// Lines that are not entries are ignored.
pub fn parse_entries(markdown: &str) -> Vec<Entry> {
    let re = compiled(
        &ENTRY_RE,
        r"^- \*\*(\d{4}-\d{2}-\d{2})\*\* — \[`([0-9a-f]+)`\]\([^)]*\) — (.*)$",
    );
    markdown
        .lines()
        .filter_map(|line| {
            let caps = re.captures(line)?;
            let date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()?;
            Some(Entry {
                date,
                short_id: caps[2].to_string(),
                subject: caps[3].to_string(),
            })
        })
        .collect()
}
