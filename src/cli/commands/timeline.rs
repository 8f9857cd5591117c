//! timeline command - Regenerate the timeline block of RFC documents
//!
//! # Failure policy
//!
//! A document with no history is skipped with a warning, and so is one
//! with unpaired markers. An untracked document or a failed history walk
//! aborts the whole run before anything else is written.

use anyhow::{anyhow, bail, Context as _, Result};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use super::Workspace;
use crate::cli::Context;
use crate::core::corpus;
use crate::git::Git;
use crate::timeline::{self, InjectAction};
use crate::ui::output;

/// Regenerate timelines for `paths`, or for every RFC document if empty.
pub fn timeline(ctx: &Context, dry_run: bool, paths: &[PathBuf]) -> Result<ExitCode> {
    let verbosity = ctx.verbosity;
    output::info("Starting history generation", verbosity);

    let cwd = ctx.cwd()?;
    let ws = Workspace::load(ctx)?;
    let git = Git::open(&cwd).context("Timeline generation requires a git repository")?;

    let base_url = match ws.config.repo_url() {
        Some(url) => url.to_string(),
        None => git
            .web_base_url()
            .context("Failed to read the origin remote")?
            .ok_or_else(|| anyhow!("Could not determine GitHub repo URL"))?,
    };
    output::info(format!("Repo URL: {base_url}"), verbosity);

    let files = if paths.is_empty() {
        let mut found = Vec::new();
        for path in ws.discover()? {
            let bytes =
                fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
            if corpus::looks_like_rfc(&String::from_utf8_lossy(&bytes)) {
                found.push(path);
            }
        }
        if found.is_empty() {
            bail!("No RFC documents found under {}", ws.config.docs_root());
        }
        found
    } else {
        paths.iter().map(|path| cwd.join(path)).collect()
    };

    let mut updated = 0usize;
    for file in &files {
        output::debug(format!("Resolving file path via git: {}", file.display()), verbosity);
        let rel = git.resolve_tracked_path(file)?;

        output::debug(format!("Collecting commit history for: {rel}"), verbosity);
        let history = timeline::extract(&git, &rel)
            .with_context(|| format!("Failed to read history of {rel}"))?;
        output::debug(
            format!(
                "Found {} commits ({} timeline-only skipped)",
                history.commits.len(),
                history.dropped
            ),
            verbosity,
        );

        let text =
            fs::read_to_string(file).with_context(|| format!("Failed to read {rel}"))?;
        let Some(injection) = timeline::regenerate(&history, &base_url, &text) else {
            output::warn(format!("No history found for {rel}"), verbosity);
            continue;
        };

        match injection.action {
            InjectAction::MalformedMarkers => {
                output::warn(format!("Unpaired timeline markers in {rel}; skipped"), verbosity);
            }
            InjectAction::Unchanged => {
                output::debug(format!("Timeline unchanged in {rel}"), verbosity);
            }
            InjectAction::Replaced | InjectAction::Inserted => {
                updated += 1;
                if dry_run {
                    output::info(format!("Timeline would be injected into {rel}"), verbosity);
                } else {
                    fs::write(file, &injection.text)
                        .with_context(|| format!("Failed to write {rel}"))?;
                    output::info(format!("Timeline injected into {rel}"), verbosity);
                }
            }
        }
    }

    if dry_run {
        output::info(format!("Timelines would be updated in {updated} files"), verbosity);
    } else {
        output::info(format!("Timelines updated in {updated} files"), verbosity);
    }
    Ok(ExitCode::SUCCESS)
}
