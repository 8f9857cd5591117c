//! Integration tests for the timeline pipeline.
//!
//! These tests build real repositories, regenerate timelines through the
//! library, commit the result the way a CI job would, and check that the
//! pipeline converges instead of growing on every run.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use rfcledger::git::Git;
use rfcledger::timeline::filter::should_drop;
use rfcledger::timeline::render::parse_entries;
use rfcledger::timeline::{extract, regenerate, InjectAction, Injection};

const BASE: &str = "https://github.com/org/rfcs";
const DOC: &str = "docs/raw/gossip.md";

/// Test fixture that creates a real git repository.
struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        run_git(dir.path(), &["init", "-b", "main"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn git(&self) -> Git {
        Git::open(self.path()).expect("failed to open test repo")
    }

    fn write(&self, rel: &str, content: &str) {
        let full = self.path().join(rel);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path().join(rel)).unwrap()
    }

    fn commit_all(&self, message: &str) {
        run_git(self.path(), &["add", "-A"]);
        run_git(self.path(), &["commit", "-m", message]);
    }

    /// Regenerate the timeline of `rel` and write it back if it changed.
    fn regenerate(&self, rel: &str) -> Injection {
        let git = self.git();
        let history = extract(&git, rel).unwrap();
        let injection = regenerate(&history, BASE, &self.read(rel)).expect("history exists");
        if injection.changed() {
            self.write(rel, &injection.text);
        }
        injection
    }
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn rfc_text(abstract_text: &str) -> String {
    format!(
        "# 12/GOSSIP\n\n| Field | Value |\n| --- | --- |\n| Name | Gossip |\n| Slug | 12 |\n\
         | Status | raw |\n| Category | Networking |\n| Editor | Ana <ana@example.org> |\n\n\
         ## Abstract\n\n{abstract_text}\n"
    )
}

fn subjects(text: &str) -> Vec<String> {
    parse_entries(text).into_iter().map(|e| e.subject).collect()
}

#[test]
fn first_run_inserts_after_table() {
    let repo = TestRepo::new();
    repo.write(DOC, &rfc_text("Peers exchange messages."));
    repo.commit_all("Add gossip draft");

    let injection = repo.regenerate(DOC);
    assert_eq!(injection.action, InjectAction::Inserted);

    let text = repo.read(DOC);
    assert!(text.contains(
        "| Editor | Ana <ana@example.org> |\n\n<!-- timeline:start -->\n\n## Timeline\n\n- **"
    ));
    assert!(text.contains("<!-- timeline:end -->\n\n## Abstract"));
    assert_eq!(subjects(&text), vec!["Add gossip draft"]);
}

#[test]
fn committed_timeline_does_not_add_itself() {
    let repo = TestRepo::new();
    repo.write(DOC, &rfc_text("Peers exchange messages."));
    repo.commit_all("Add gossip draft");

    repo.regenerate(DOC);
    repo.commit_all("Update timelines");

    let second = repo.regenerate(DOC);
    assert_eq!(second.action, InjectAction::Unchanged);
    assert_eq!(subjects(&repo.read(DOC)), vec!["Add gossip draft"]);
}

#[test]
fn converges_across_edits() {
    let repo = TestRepo::new();
    repo.write(DOC, &rfc_text("Peers exchange messages."));
    repo.commit_all("Add gossip draft");
    repo.regenerate(DOC);
    repo.commit_all("Update timelines");

    // edit the body of the document with its timeline in place
    let edited = repo
        .read(DOC)
        .replace("Peers exchange messages.", "Peers exchange signed messages.");
    repo.write(DOC, &edited);
    repo.commit_all("Require signatures");

    let third = repo.regenerate(DOC);
    assert_eq!(third.action, InjectAction::Replaced);
    repo.commit_all("Update timelines");

    let text = repo.read(DOC);
    assert_eq!(subjects(&text), vec!["Require signatures", "Add gossip draft"]);

    let history = extract(&repo.git(), DOC).unwrap();
    assert_eq!(history.dropped, 2);
    assert_eq!(repo.regenerate(DOC).action, InjectAction::Unchanged);
}

#[test]
fn timeline_only_classification_is_stable() {
    let repo = TestRepo::new();
    repo.write(DOC, &rfc_text("Peers exchange messages."));
    repo.commit_all("Add gossip draft");
    repo.regenerate(DOC);
    repo.commit_all("Update timelines");

    let git = repo.git();
    let all = git.history(DOC).unwrap();
    let timeline_commit = all.last().unwrap().clone();
    assert!(should_drop(&git, &timeline_commit));

    // pile up more timeline-only commits by hand-editing the block
    for n in 0..3 {
        let text = repo
            .read(DOC)
            .replace("## Timeline", &format!("## Timeline\n\n<!-- pass {n} -->"));
        repo.write(DOC, &text);
        repo.commit_all("Touch timeline");
    }

    let git = repo.git();
    assert!(should_drop(&git, &timeline_commit));
    let history = extract(&git, DOC).unwrap();
    assert_eq!(history.commits.len(), 1);
    assert_eq!(history.dropped, 4);
}

#[test]
fn renamed_document_links_old_path() {
    let repo = TestRepo::new();
    repo.write(DOC, &rfc_text("Peers exchange messages."));
    repo.commit_all("Add gossip draft");
    fs::create_dir_all(repo.path().join("docs/stable")).unwrap();
    run_git(repo.path(), &["mv", DOC, "docs/stable/gossip.md"]);
    repo.commit_all("Promote gossip");

    repo.regenerate("docs/stable/gossip.md");
    let text = repo.read("docs/stable/gossip.md");
    assert!(text.contains("/docs/raw/gossip.md) — Add gossip draft"));
    assert!(text.contains("/docs/stable/gossip.md) — Promote gossip"));
}
