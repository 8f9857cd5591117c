//! timeline::inject
//!
//! Idempotent placement of the timeline block in a document.
//!
//! # Placement
//!
//! - Both markers present, start before end: the first start..end span is
//!   replaced, and any run of blank lines after the end marker collapses to
//!   a single blank line
//! - No markers: the block is inserted after the metadata table, else
//!   after the first `# ` heading, else at the top, with exactly one blank
//!   line on each side
//! - A lone or misordered marker: the text is left alone
//!
//! # Invariants
//!
//! - `inject(inject(x, t).text, t)` leaves the text unchanged
//! - Text outside the block and its surrounding blank lines is never touched

use crate::core::table;
use crate::timeline::{END_MARKER, START_MARKER};

/// What [`inject`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectAction {
    /// An existing block was rewritten.
    Replaced,
    /// A new block was inserted.
    Inserted,
    /// The block was already up to date.
    Unchanged,
    /// Markers are unpaired or out of order; nothing was written.
    MalformedMarkers,
}

/// Result of injecting a timeline into a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    pub text: String,
    pub action: InjectAction,
}

impl Injection {
    /// Whether the text differs from the input.
    pub fn changed(&self) -> bool {
        matches!(self.action, InjectAction::Replaced | InjectAction::Inserted)
    }
}

/// Wrap rendered markdown in the timeline markers.
pub fn block(rendered: &str) -> String {
    format!("{START_MARKER}\n\n{}\n\n{END_MARKER}\n", rendered.trim())
}

/// Place `rendered` into `text`, replacing any existing block.
///
/// # Example
///
/// ```
/// use rfcledger::timeline::inject::{inject, InjectAction};
///
/// let once = inject("# Title\n\nBody\n", "## Timeline\n");
/// assert_eq!(once.action, InjectAction::Inserted);
/// assert_eq!(
///     once.text,
///     "# Title\n\n<!-- timeline:start -->\n\n## Timeline\n\n<!-- timeline:end -->\n\nBody\n"
/// );
///
/// let twice = inject(&once.text, "## Timeline\n");
/// assert_eq!(twice.action, InjectAction::Unchanged);
/// ```
pub fn inject(text: &str, rendered: &str) -> Injection {
    let block = block(rendered);

    let new_text = match marker_span(text) {
        Markers::Span(start, end) => replace_span(text, start, end, &block),
        Markers::Absent => insert_block(text, &block),
        Markers::Malformed => {
            return Injection {
                text: text.to_string(),
                action: InjectAction::MalformedMarkers,
            }
        }
    };

    let action = if new_text == text {
        InjectAction::Unchanged
    } else if text.contains(START_MARKER) {
        InjectAction::Replaced
    } else {
        InjectAction::Inserted
    };
    Injection {
        text: new_text,
        action,
    }
}

enum Markers {
    /// Byte offsets of the start marker and one past the end marker.
    Span(usize, usize),
    Absent,
    Malformed,
}

fn marker_span(text: &str) -> Markers {
    let Some(start) = text.find(START_MARKER) else {
        if text.contains(END_MARKER) {
            return Markers::Malformed;
        }
        return Markers::Absent;
    };
    match text[start..].find(END_MARKER) {
        Some(offset) => Markers::Span(start, start + offset + END_MARKER.len()),
        None => Markers::Malformed,
    }
}

fn replace_span(text: &str, start: usize, end: usize, block: &str) -> String {
    let tail = &text[end..];
    let tail = tail.strip_prefix('\n').unwrap_or(tail);

    // the block already ends in a newline; keep at most one blank line after it
    let newlines = tail.len() - tail.trim_start_matches('\n').len();
    let tail = if newlines >= 2 {
        &tail[newlines - 1..]
    } else {
        tail
    };

    let mut out = String::with_capacity(text.len() + block.len());
    out.push_str(&text[..start]);
    out.push_str(block);
    out.push_str(tail);
    out
}

fn insert_block(text: &str, block: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let at = insertion_line(&lines);

    let mut before = &lines[..at];
    while let Some((last, rest)) = before.split_last() {
        if !last.trim().is_empty() {
            break;
        }
        before = rest;
    }
    let mut after = &lines[at..];
    while let Some((first, rest)) = after.split_first() {
        if !first.trim().is_empty() {
            break;
        }
        after = rest;
    }

    let mut out = String::with_capacity(text.len() + block.len() + 4);
    if !before.is_empty() {
        out.push_str(&before.join("\n"));
        out.push_str("\n\n");
    }
    out.push_str(block);
    if !after.is_empty() {
        out.push('\n');
        out.push_str(&after.join("\n"));
        if text.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

/// Index of the first line that goes after the block.
fn insertion_line(lines: &[&str]) -> usize {
    if let Some(info) = table::locate(lines) {
        return info.end;
    }
    lines
        .iter()
        .position(|line| line.starts_with("# "))
        .map(|idx| idx + 1)
        .unwrap_or(0)
}
