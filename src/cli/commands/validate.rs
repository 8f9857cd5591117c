//! validate command - Check metadata tables and assign missing slugs
//!
//! Runs the ledger pass over every discovered document. Assigned slugs are
//! written back even when validation fails, so a later run only has the
//! remaining issues to report.

use anyhow::{Context as _, Result};
use std::process::ExitCode;

use super::Workspace;
use crate::cli::Context;
use crate::core::corpus::Document;
use crate::core::ledger;
use crate::ui::output;

/// Validate the corpus, assigning slugs unless `check` is set.
///
/// The exit code is the issue count, clamped to 1..=255 on failure.
pub fn validate(ctx: &Context, check: bool, json: bool) -> Result<ExitCode> {
    let ws = Workspace::load(ctx)?;
    let exclusions = ws.exclusions();

    let mut docs = ws
        .discover()?
        .iter()
        .map(|path| ws.load_document(path))
        .collect::<Result<Vec<Document>>>()?;
    output::debug(
        format!(
            "Discovered {} document(s) under {}",
            docs.len(),
            ws.config.docs_root()
        ),
        ctx.verbosity,
    );

    let report = ledger::run(&mut docs, &exclusions, check);

    if !check {
        for doc in docs.iter().filter(|doc| doc.assigned_slug.is_some()) {
            let written = doc
                .save()
                .with_context(|| format!("Failed to update {}", doc.display_path()))?;
            if written {
                output::debug(format!("Wrote {}", doc.display_path()), ctx.verbosity);
            }
        }
    }

    if json {
        let rendered = serde_json::to_string_pretty(&report.to_json())
            .context("Failed to serialize report")?;
        println!("{rendered}");
    } else {
        for fix in &report.fixes {
            output::print(fix.diagnostic(), ctx.verbosity);
        }
        for issue in report.issues() {
            println!("{}", issue.diagnostic());
        }
        println!("{}", report.summary());
    }

    Ok(ExitCode::from(report.exit_code()))
}
