// src/export.rs
// =============================================================================
// This module writes check results to a file.
//
// The format follows the target extension:
// - .csv: one detail row per outcome (url, status, elapsed, final url,
//   domains)
// - .json: the entire RunSummary, pretty-printed
// Anything else is rejected so a typo never silently produces the wrong
// format.
// =============================================================================

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::checker::{ProbeOutcome, RunSummary};

// Flat row shape for the CSV detail export; Option fields become empty
// cells
#[derive(Debug, Serialize)]
struct ExportRecord {
    url: String,
    status: String,
    elapsed_seconds: f64,
    final_url: String,
    main_domain: String,
    true_domain: String,
}

impl ExportRecord {
    fn from_outcome(outcome: &ProbeOutcome) -> Self {
        Self {
            url: outcome.url.clone(),
            status: outcome.classification.to_string(),
            elapsed_seconds: outcome.elapsed_seconds,
            final_url: outcome.final_url.clone().unwrap_or_default(),
            main_domain: outcome.main_domain.clone().unwrap_or_default(),
            true_domain: outcome.true_domain.clone().unwrap_or_default(),
        }
    }
}

/// Writes the run's results to `path`, picking the format by extension.
pub fn export_results(path: &Path, summary: &RunSummary) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") => export_csv(path, summary),
        Some("json") => export_json(path, summary),
        _ => bail!(
            "unsupported export format for {} (use .csv or .json)",
            path.display()
        ),
    }
}

fn export_csv(path: &Path, summary: &RunSummary) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for outcome in &summary.outcomes {
        writer
            .serialize(ExportRecord::from_outcome(outcome))
            .context("failed to write CSV record")?;
    }

    writer.flush().context("failed to flush CSV export")?;
    Ok(())
}

fn export_json(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("failed to serialize summary")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
