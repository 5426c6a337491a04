// src/input/mod.rs
// =============================================================================
// This module acquires the raw URL text to check.
//
// Two sources are supported:
// - Free-form text from a file or stdin (one URL somewhere per line)
// - The 'link' column of a CSV file
//
// Whatever the source, the output is an ordered sequence of candidate
// lines; the checker's extractor decides what is actually a URL.
// =============================================================================

mod read;

// Re-export the reading functions
pub use read::{read_csv_links, read_csv_links_from_path, read_text};
