// src/input/read.rs
// =============================================================================
// This module reads URL input from files, stdin, and CSV link columns.
//
// CSV handling:
// - The header row must contain a 'link' column (matched case-insensitively)
// - Other columns are ignored
// - Empty cells are skipped; everything else is handed to the extractor,
//   so junk rows fall out the same way junk text lines do
// =============================================================================

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Reads free-form text from a file, or from stdin when no path is given.
pub fn read_text(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Reads the 'link' column of a CSV file.
pub fn read_csv_links_from_path(path: &Path) -> Result<Vec<String>> {
    let file = fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_csv_links(file)
}

/// Reads the 'link' column from CSV data.
///
/// The header match is case-insensitive; a CSV without a link column is
/// a hard error, since checking the wrong column silently would be worse
/// than refusing.
pub fn read_csv_links<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_reader(reader);

    let headers = reader.headers().context("failed to read CSV headers")?;
    let link_column = headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case("link"))
        .ok_or_else(|| anyhow!("CSV file has no 'link' column"))?;

    let mut links = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to read CSV record")?;
        if let Some(cell) = record.get(link_column) {
            let cell = cell.trim();
            if !cell.is_empty() {
                links.push(cell.to_string());
            }
        }
    }

    Ok(links)
}
