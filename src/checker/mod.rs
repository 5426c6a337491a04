// src/checker/mod.rs
// =============================================================================
// This module contains the URL checking engine.
//
// Submodules:
// - extract: Pulls candidate URLs out of free-form text
// - domain: Derives the host and true-domain of a URL
// - probe: Issues one HTTP probe and classifies the outcome
// - schedule: Runs probes in bounded-concurrency batches
// - aggregate: Accumulates outcomes into the run summary
//
// This file (mod.rs) is the module root - it exports the public API that
// the CLI and export layers consume.
// =============================================================================

mod aggregate;
mod domain;
mod extract;
mod probe;
mod schedule;

#[cfg(test)]
mod test_server;

// Re-export public items from submodules so callers write
// `checker::check_urls()` instead of `checker::schedule::check_urls()`
pub use aggregate::{Aggregator, DomainGroup, RunSummary, StatusBucket};
pub use domain::normalize;
pub use extract::extract_urls;
pub use probe::{probe_url, ProbeOutcome, StatusClass};
pub use schedule::{check_urls, check_urls_cancellable, CheckOptions, ProbeMethod};
