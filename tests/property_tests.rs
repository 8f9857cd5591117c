//! Property-based tests for the table model, allocator, and timeline.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use proptest::prelude::*;

use rfcledger::core::slugs::SlugAllocator;
use rfcledger::core::table::locate;
use rfcledger::core::types::{CommitId, Slug};
use rfcledger::git::CommitRecord;
use rfcledger::timeline::filter::{is_timeline_only, normalize};
use rfcledger::timeline::inject::{block, inject, InjectAction};
use rfcledger::timeline::render::{parse_entries, render};

/// Strategy for field labels: capitalized words, no pipes.
fn label() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,10}"
}

/// Strategy for cell values: printable text without pipes or edge spaces.
fn value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9<>@.,:;() -]{0,30}".prop_map(|s| s.trim().to_string())
}

/// Strategy for a well-formed table with distinct labels.
fn table_rows() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((label(), value()), 1..8).prop_map(|rows| {
        let mut seen = BTreeSet::new();
        rows.into_iter()
            .filter(|(label, _)| seen.insert(label.to_lowercase()))
            .collect()
    })
}

/// Strategy for prose lines around the table.
fn prose() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z #]{0,20}", 0..6)
}

fn document(before: &[String], rows: &[(String, String)], after: &[String]) -> Vec<String> {
    let mut lines: Vec<String> = before
        .iter()
        .filter(|l| !l.starts_with('|'))
        .cloned()
        .collect();
    lines.push("| Field | Value |".to_string());
    lines.push("| --- | --- |".to_string());
    for (label, value) in rows {
        lines.push(format!("| {label} | {value} |"));
    }
    lines.push(String::new());
    lines.extend(after.iter().cloned());
    lines
}

fn subject() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 ,.:()'#-]{0,40}".prop_map(|s| s.trim_end().to_string())
}

fn commit_record() -> impl Strategy<Value = CommitRecord> {
    (
        "[0-9a-f]{40}",
        (2000i32..2100, 1u32..13, 1u32..29),
        subject(),
        "[a-z]{1,8}(/[a-z]{1,8}){0,2}\\.md",
    )
        .prop_map(|(id, (y, m, d), subject, path)| CommitRecord {
            id: CommitId::new(id).unwrap(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            subject,
            path,
        })
}

/// Strategy for arbitrary markdown-ish documents, with or without a block.
fn markdown() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(
            prop_oneof![
                Just("# Title".to_string()),
                Just(String::new()),
                Just("| Field | Value |".to_string()),
                Just("| --- | --- |".to_string()),
                Just("| Slug | 1 |".to_string()),
                "[a-z ]{0,20}",
            ],
            0..12,
        ),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(lines, with_block, trailing_newline)| {
            let mut text = lines.join("\n");
            if with_block {
                text.push_str("\n<!-- timeline:start -->\nold\n<!-- timeline:end -->\n\n\nTail");
            }
            if trailing_newline {
                text.push('\n');
            }
            text
        })
}

proptest! {
    /// Rewriting one field keeps every other field intact.
    #[test]
    fn set_field_changes_only_that_field(
        before in prose(),
        rows in table_rows(),
        after in prose(),
        pick in any::<prop::sample::Index>(),
        new_value in value(),
    ) {
        let mut lines = document(&before, &rows, &after);
        let table = locate(&lines).unwrap();
        let original = table.meta();

        let (label, _) = &rows[pick.index(rows.len())];
        let key = label.to_lowercase();
        let updated = table.set_field(&mut lines, &key, &new_value).unwrap();

        let mut expected = original.clone();
        expected.insert(key.clone(), new_value.clone());
        prop_assert_eq!(updated.meta(), expected);
        prop_assert_eq!(locate(&lines).unwrap(), updated);
    }

    /// Inserting a missing field leaves the existing ones untouched.
    #[test]
    fn inserted_field_is_added(rows in table_rows(), new_value in value()) {
        let mut lines = document(&[], &rows, &[]);
        let table = locate(&lines).unwrap();
        let original = table.meta();
        prop_assume!(!original.contains_key("zzslug"));

        let updated = table.set_field(&mut lines, "zzslug", &new_value).unwrap();
        let mut expected = original;
        expected.insert("zzslug".to_string(), new_value);
        prop_assert_eq!(updated.meta(), expected);
    }

    /// Allocated slugs are distinct, avoid the used set, and fill the smallest gaps.
    #[test]
    fn allocation_is_collision_free(
        used in prop::collection::btree_set(1u32..60, 0..30),
        count in 1usize..20,
    ) {
        let used_slugs: Vec<Slug> = used.iter().map(|n| Slug::new(*n).unwrap()).collect();
        let mut allocator = SlugAllocator::new(used_slugs);

        let mut taken: BTreeSet<u32> = used.clone();
        for _ in 0..count {
            let slug = allocator.allocate().get();
            let smallest = (1u32..).find(|n| !taken.contains(n)).unwrap();
            prop_assert_eq!(slug, smallest);
            prop_assert!(taken.insert(slug));
        }
    }

    /// Injecting twice is the same as injecting once.
    #[test]
    fn inject_is_idempotent(text in markdown(), records in prop::collection::vec(commit_record(), 1..5)) {
        let rendered = render("https://github.com/o/r", &records);
        let once = inject(&text, &rendered);
        let twice = inject(&once.text, &rendered);
        prop_assert_eq!(&twice.text, &once.text);
        if once.action != InjectAction::MalformedMarkers {
            prop_assert_eq!(twice.action, InjectAction::Unchanged);
            prop_assert!(once.text.contains(&block(&rendered)));
        }
    }

    /// Changing only the block is always classified timeline-only.
    #[test]
    fn block_edits_are_timeline_only(
        text in markdown(),
        first in prop::collection::vec(commit_record(), 1..4),
        second in prop::collection::vec(commit_record(), 1..4),
    ) {
        let a = inject(&text, &render("https://github.com/o/r", &first));
        prop_assume!(a.action != InjectAction::MalformedMarkers);
        let b = inject(&a.text, &render("https://github.com/o/r", &second));
        prop_assert!(is_timeline_only(&b.text, &a.text));
        prop_assert_eq!(normalize(&normalize(&a.text)), normalize(&a.text));
    }

    /// The visible (date, id, subject) triple survives rendering.
    #[test]
    fn render_round_trip(records in prop::collection::vec(commit_record(), 0..8)) {
        let entries = parse_entries(&render("https://github.com/o/r", &records));
        prop_assert_eq!(entries.len(), records.len());
        for (entry, record) in entries.iter().zip(records.iter().rev()) {
            prop_assert_eq!(entry.date, record.date);
            prop_assert_eq!(entry.short_id.as_str(), record.id.short(7));
            prop_assert_eq!(&entry.subject, &record.subject);
        }
    }
}
