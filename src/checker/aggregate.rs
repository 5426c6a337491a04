// src/checker/aggregate.rs
// =============================================================================
// This module accumulates probe outcomes into a run summary.
//
// Three views are built up as outcomes arrive:
// - buckets: one per distinct classification, in first-seen order, each
//   listing its URLs in completion order
// - domains: a count per (true domain, classification) pair
// - totals: number of URLs checked and the summed per-probe seconds
//
// The aggregator is owned by the scheduler's drain loop and fed one
// outcome at a time, so updates apply serially — arbitrary completion
// order is tolerated and nothing is lost to concurrent writes. finalize()
// consumes the aggregator; a new run always starts from a fresh one.
// =============================================================================

use serde::Serialize;

use super::probe::{ProbeOutcome, StatusClass};

/// All outcomes that share one classification.
#[derive(Debug, Clone, Serialize)]
pub struct StatusBucket {
    /// Status code or Error
    pub classification: StatusClass,
    /// How many outcomes landed here
    pub count: usize,
    /// The bucket's URLs, in completion order
    pub urls: Vec<String>,
}

/// Count of one classification within one true domain.
#[derive(Debug, Clone, Serialize)]
pub struct DomainGroup {
    /// The true domain shared by these outcomes
    pub true_domain: String,
    /// Status code or Error
    pub classification: StatusClass,
    /// How many outcomes landed here
    pub count: usize,
}

/// Immutable snapshot of one completed (or cancelled) check run.
///
/// A plain serializable structure with no live handles, so any
/// presentation layer can consume or persist it.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Number of probed URLs; equals the sum of all bucket counts
    pub total_checked: usize,
    /// Sum of per-probe elapsed seconds (not wall-clock time)
    pub total_elapsed_seconds: f64,
    /// Per-classification buckets, in first-seen order
    pub buckets: Vec<StatusBucket>,
    /// Per-(true domain, classification) counts, in first-seen order
    pub domains: Vec<DomainGroup>,
    /// Every outcome of the run, in completion order
    pub outcomes: Vec<ProbeOutcome>,
}

impl RunSummary {
    /// The bucket count for one classification, 0 when absent.
    pub fn count_for(&self, classification: StatusClass) -> usize {
        self.buckets
            .iter()
            .find(|bucket| bucket.classification == classification)
            .map_or(0, |bucket| bucket.count)
    }

    /// Outcomes that are neither 2xx nor 3xx (including Error).
    pub fn broken_count(&self) -> usize {
        self.buckets
            .iter()
            .filter(|bucket| !bucket.classification.is_ok())
            .map(|bucket| bucket.count)
            .sum()
    }

    /// Mean per-probe seconds; 0 for an empty run.
    pub fn average_seconds_per_url(&self) -> f64 {
        if self.total_checked == 0 {
            0.0
        } else {
            self.total_elapsed_seconds / self.total_checked as f64
        }
    }
}

/// Builds a RunSummary incrementally from probe outcomes.
#[derive(Debug, Default)]
pub struct Aggregator {
    total_checked: usize,
    total_elapsed_seconds: f64,
    buckets: Vec<StatusBucket>,
    domains: Vec<DomainGroup>,
    outcomes: Vec<ProbeOutcome>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Incorporates one outcome into the running summary.
    pub fn ingest(&mut self, outcome: ProbeOutcome) {
        self.total_checked += 1;
        self.total_elapsed_seconds += outcome.elapsed_seconds;

        // Buckets keep the order their classification was first seen in;
        // a linear scan is fine for the handful of distinct statuses a
        // run produces
        match self
            .buckets
            .iter_mut()
            .find(|bucket| bucket.classification == outcome.classification)
        {
            Some(bucket) => {
                bucket.count += 1;
                bucket.urls.push(outcome.url.clone());
            }
            None => self.buckets.push(StatusBucket {
                classification: outcome.classification,
                count: 1,
                urls: vec![outcome.url.clone()],
            }),
        }

        // Outcomes without a domain (network errors) are not grouped;
        // they stay visible in the Error bucket and the detail list
        if let Some(true_domain) = &outcome.true_domain {
            match self.domains.iter_mut().find(|group| {
                group.true_domain == *true_domain
                    && group.classification == outcome.classification
            }) {
                Some(group) => group.count += 1,
                None => self.domains.push(DomainGroup {
                    true_domain: true_domain.clone(),
                    classification: outcome.classification,
                    count: 1,
                }),
            }
        }

        self.outcomes.push(outcome);
    }

    /// Returns the immutable summary, consuming the aggregator.
    pub fn finalize(self) -> RunSummary {
        RunSummary {
            total_checked: self.total_checked,
            total_elapsed_seconds: self.total_elapsed_seconds,
            buckets: self.buckets,
            domains: self.domains,
            outcomes: self.outcomes,
        }
    }
}
