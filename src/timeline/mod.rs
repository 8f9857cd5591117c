//! timeline
//!
//! The timeline engine: per-document commit history, rendered to markdown
//! and kept inside a marker-delimited block.
//!
//! # Pipeline
//!
//! 1. [`history::extract`] walks the file's history through [`crate::git`]
//!    and runs the fixed-point filter over it
//! 2. [`render::render`] turns the retained commits into a `## Timeline`
//!    section
//! 3. [`inject::inject`] replaces or inserts the block in the document text
//!
//! # Invariants
//!
//! - Re-running the pipeline on an unchanged repository produces
//!   byte-identical documents
//! - Commits that only rewrote the block never appear in it

pub mod filter;
pub mod history;
pub mod inject;
pub mod render;

pub use history::{extract, FileHistory};
pub use inject::{inject, InjectAction, Injection};

/// Marker line opening the generated block.
pub const START_MARKER: &str = "<!-- timeline:start -->";

/// Marker line closing the generated block.
pub const END_MARKER: &str = "<!-- timeline:end -->";

/// Render `history` and inject it into `text`.
///
/// Returns `None` when the history is empty; such documents are skipped.
pub fn regenerate(history: &FileHistory, base_url: &str, text: &str) -> Option<Injection> {
    if history.is_empty() {
        return None;
    }
    let markdown = render::render(base_url, &history.commits);
    Some(inject(text, &markdown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::MemoryHistory;

    #[test]
    fn empty_history_is_skipped() {
        let history = FileHistory {
            path: "docs/a.md".into(),
            commits: Vec::new(),
            dropped: 0,
        };
        assert_eq!(regenerate(&history, "https://x", "# A\n"), None);
    }

    #[test]
    fn regenerated_text_is_stable() {
        let id = MemoryHistory::id(1);
        let history = FileHistory {
            path: "docs/a.md".into(),
            commits: vec![MemoryHistory::record(&id, "docs/a.md", "add")],
            dropped: 0,
        };
        let first = regenerate(&history, "https://github.com/o/r", "# A\n\nBody\n").unwrap();
        assert_eq!(first.action, InjectAction::Inserted);
        assert!(first.text.contains("- **2024-01-01** — [`0000000`]"));

        let second = regenerate(&history, "https://github.com/o/r", &first.text).unwrap();
        assert_eq!(second.action, InjectAction::Unchanged);
    }
}
