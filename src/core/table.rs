//! core::table
//!
//! Locating, reading, and rewriting the `| Field | Value |` metadata table
//! embedded near the top of a document.
//!
//! # Shape
//!
//! ```text
//! | Field    | Value            |
//! | -------- | ---------------- |
//! | Name     | Gossip transport |
//! | Slug     | 12               |
//! ```
//!
//! The table starts at a header row, requires a separator row immediately
//! after it, and then runs over every following line that begins with a
//! pipe. The first line that does not begin with a pipe ends it.
//!
//! # Tolerance
//!
//! Parsing is line-oriented and never fails: [`locate`] either finds a table
//! or returns `None`. Rows that begin with a pipe but do not match the
//! two-cell pattern still belong to the table range; they are skipped when
//! building the field map and reported by the validator.
//!
//! # Invariants
//!
//! - At most one table is recognized per document (the first match)
//! - The first occurrence of a duplicated field wins
//! - Any structural edit re-locates the table; line indices are never
//!   patched incrementally

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

/// Number of leading lines searched for the header row.
pub const DEFAULT_SCAN_WINDOW: usize = 140;

/// The only header text accepted as canonical.
pub const CANONICAL_HEADER: &str = "| Field | Value |";

static HEADER_RE: OnceLock<Regex> = OnceLock::new();
static SEPARATOR_RE: OnceLock<Regex> = OnceLock::new();
static ROW_RE: OnceLock<Regex> = OnceLock::new();

pub(crate) fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern is valid"))
}

/// Whether a line looks like a Field/Value header, ignoring case and padding.
pub fn is_header(line: &str) -> bool {
    compiled(&HEADER_RE, r"(?i)^\|\s*field\s*\|\s*value\s*\|$").is_match(line.trim())
}

/// Whether a line is exactly the canonical header (after trimming).
pub fn is_canonical_header(line: &str) -> bool {
    line.trim() == CANONICAL_HEADER
}

/// Whether a line is a two-column markdown rule such as `|---|:---:|`.
pub fn is_separator(line: &str) -> bool {
    compiled(
        &SEPARATOR_RE,
        r"^\|\s*:?-{3,}:?\s*\|\s*:?-{3,}:?\s*\|$",
    )
    .is_match(line.trim())
}

/// Split a two-cell row into its trimmed `(label, value)` pair.
///
/// Returns `None` when the line does not match the row pattern: the label
/// cell must be non-empty and free of pipes, and the row must end with a pipe.
///
/// # Example
///
/// ```
/// use rfcledger::core::table::parse_row;
///
/// assert_eq!(parse_row("| Status | draft |"), Some(("Status", "draft")));
/// assert_eq!(parse_row("| Editor |  |"), Some(("Editor", "")));
/// assert_eq!(parse_row("| Status | draft"), None);
/// ```
pub fn parse_row(line: &str) -> Option<(&str, &str)> {
    let caps = compiled(&ROW_RE, r"^\|\s*([^|]+?)\s*\|\s*(.*?)\s*\|$").captures(line.trim())?;
    let label = caps.get(1)?.as_str().trim();
    if label.is_empty() {
        return None;
    }
    let value = caps.get(2)?.as_str().trim();
    Some((label, value))
}

/// Whether a line belongs to a table body.
fn is_table_line(line: &str) -> bool {
    line.trim().starts_with('|')
}

/// One parsed row of the metadata table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Zero-based line index of the row.
    pub line: usize,
    /// The field label as written, e.g. `Slug`.
    pub label: String,
    /// The trimmed value cell.
    pub value: String,
}

/// A located metadata table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    /// Zero-based line index of the header row.
    pub start: usize,
    /// Zero-based line index of the separator row.
    pub separator: usize,
    /// Zero-based index one past the last table row.
    pub end: usize,
    /// Rows keyed by lowercased field name.
    pub rows: BTreeMap<String, TableRow>,
    window: usize,
}

/// Locate the metadata table within the default scan window.
pub fn locate<S: AsRef<str>>(lines: &[S]) -> Option<TableInfo> {
    locate_within(lines, DEFAULT_SCAN_WINDOW)
}

/// Locate the metadata table, searching the first `window` lines for a header.
///
/// A header only counts when the very next line is a valid separator; an
/// unmatched header is skipped and the search continues.
pub fn locate_within<S: AsRef<str>>(lines: &[S], window: usize) -> Option<TableInfo> {
    let max_scan = window.min(lines.len());
    for idx in 0..max_scan {
        if !is_header(lines[idx].as_ref()) {
            continue;
        }
        match lines.get(idx + 1) {
            Some(next) if is_separator(next.as_ref()) => {}
            _ => continue,
        }

        let mut rows = BTreeMap::new();
        let mut row_idx = idx + 2;
        while row_idx < lines.len() && is_table_line(lines[row_idx].as_ref()) {
            if let Some((label, value)) = parse_row(lines[row_idx].as_ref()) {
                rows.entry(label.to_lowercase()).or_insert_with(|| TableRow {
                    line: row_idx,
                    label: label.to_string(),
                    value: value.to_string(),
                });
            }
            row_idx += 1;
        }

        return Some(TableInfo {
            start: idx,
            separator: idx + 1,
            end: row_idx,
            rows,
            window,
        });
    }
    None
}

impl TableInfo {
    /// Look up a field value by case-insensitive name.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.rows
            .get(&field.to_lowercase())
            .map(|row| row.value.as_str())
    }

    /// Lowercased field name to value mapping.
    pub fn meta(&self) -> BTreeMap<String, String> {
        self.rows
            .iter()
            .map(|(key, row)| (key.clone(), row.value.clone()))
            .collect()
    }

    /// Line indices of body rows, header and separator excluded.
    pub fn body(&self) -> std::ops::Range<usize> {
        self.separator + 1..self.end
    }

    /// Set a field value and return the re-located table.
    ///
    /// An existing row is rewritten in place, keeping its label casing. A
    /// missing field is inserted after the `name` row, else after the
    /// `status` row, else as the first body row.
    ///
    /// Returns `None` only if the table can no longer be found, which would
    /// mean the edit destroyed the header.
    ///
    /// # Example
    ///
    /// ```
    /// use rfcledger::core::table::locate;
    ///
    /// let mut lines: Vec<String> = ["| Field | Value |", "|---|---|", "| Name | Gossip |"]
    ///     .iter()
    ///     .map(|s| s.to_string())
    ///     .collect();
    /// let table = locate(&lines).unwrap();
    /// let table = table.set_field(&mut lines, "slug", "4").unwrap();
    /// assert_eq!(lines[3], "| Slug | 4 |");
    /// assert_eq!(table.get("slug"), Some("4"));
    /// ```
    pub fn set_field(self, lines: &mut Vec<String>, field: &str, value: &str) -> Option<TableInfo> {
        let key = field.to_lowercase();
        if let Some(row) = self.rows.get(&key) {
            lines[row.line] = format!("| {} | {} |", row.label, value);
        } else {
            let insert_at = self
                .rows
                .get("name")
                .or_else(|| self.rows.get("status"))
                .map(|row| row.line + 1)
                .unwrap_or(self.separator + 1);
            lines.insert(insert_at, format!("| {} | {} |", display_label(&key), value));
        }
        locate_within(lines, self.window)
    }
}

/// Capitalize a field key for a freshly inserted row.
fn display_label(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
