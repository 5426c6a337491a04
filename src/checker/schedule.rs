// src/checker/schedule.rs
// =============================================================================
// This module runs a batch of URL probes under a bounded concurrency cap.
//
// How it works:
// 1. Validate the options and build one shared HTTP client (connection
//    pool) for the whole run
// 2. Partition the URL list into consecutive batches
// 3. Run each batch's probes concurrently with buffer_unordered, draining
//    outcomes as they complete into a single Aggregator
// 4. Wait for the whole batch before starting the next one, so at most
//    one batch's worth of requests is ever in flight
//
// A consequence of waiting per batch: one slow host delays the start of
// every later batch, not just its own siblings. Each probe still has its
// own independent timeout, which bounds the stall.
//
// Cancellation: the run watches a tokio watch channel. When it flips to
// true, the drain loop stops, in-flight probes of the current batch are
// dropped, and no further batches launch. Outcomes ingested before the
// cancel are kept — a partial summary is valid under explicit cancellation.
//
// Failure handling: a single probe's network failure surfaces only as an
// Error classification for that URL; it never aborts the batch or the run.
// =============================================================================

use anyhow::{bail, Context, Result};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::watch;

use super::aggregate::{Aggregator, RunSummary};
use super::probe::probe_url;

/// Which HTTP method the probe uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    /// Lightweight existence check, no response body
    Head,
    /// Full GET; useful against servers that reject HEAD
    Get,
}

/// Knobs for one check run.
///
/// The effective in-flight cap is `batch_size` when set, otherwise
/// `concurrency` — one number controls both the batch width and the peak
/// number of simultaneous requests. `batch_size` exists only as an
/// explicit override for callers that want smaller batch granularity
/// than the advertised concurrency.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Maximum in-flight probes (and default batch width)
    pub concurrency: usize,
    /// Optional batch-width override; defaults to `concurrency`
    pub batch_size: Option<usize>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retry a 404 response once after `retry_delay`
    pub retry_on_404: bool,
    /// Fixed delay before the single 404 retry
    pub retry_delay: Duration,
    /// HTTP method used for probes
    pub method: ProbeMethod,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            concurrency: 50,
            batch_size: None,
            timeout: Duration::from_secs(10),
            retry_on_404: true,
            retry_delay: Duration::from_secs(5),
            method: ProbeMethod::Head,
        }
    }
}

impl CheckOptions {
    /// The true concurrency cap: `batch_size` when set, else `concurrency`.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.unwrap_or(self.concurrency)
    }

    /// Rejects configurations the scheduler cannot run with.
    ///
    /// Called by `check_urls` before any probe is issued; a validation
    /// failure means the run never starts.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            bail!("concurrency must be at least 1");
        }
        if self.batch_size == Some(0) {
            bail!("batch size must be at least 1");
        }
        if self.timeout.is_zero() {
            bail!("timeout must be greater than zero");
        }
        Ok(())
    }
}

/// Checks a list of URLs and returns the aggregated summary.
///
/// Either returns a complete summary (possibly containing many
/// Error-classified outcomes) or fails before any probe runs (bad
/// options, client construction failure).
pub async fn check_urls(urls: Vec<String>, options: &CheckOptions) -> Result<RunSummary> {
    // The sender stays alive for the whole run and never fires, so the
    // cancellable variant runs to completion
    let (_cancel_tx, cancel_rx) = watch::channel(false);
    check_urls_cancellable(urls, options, cancel_rx).await
}

/// Checks a list of URLs, stopping early when `cancel` flips to true.
///
/// On cancellation the summary covers every outcome that completed
/// before the cancel; in-flight probes are dropped and later batches
/// never launch. A dropped sender disables cancellation and the run
/// continues to completion.
pub async fn check_urls_cancellable(
    urls: Vec<String>,
    options: &CheckOptions,
    mut cancel: watch::Receiver<bool>,
) -> Result<RunSummary> {
    options.validate()?;

    // One pooled client shared by every probe in the run; dropped (and
    // with it the pool) when this function returns
    let client = Client::builder()
        .timeout(options.timeout)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .context("failed to build HTTP client")?;

    let batch_size = options.effective_batch_size();
    let mut aggregator = Aggregator::new();
    // Set once the sender goes away; from then on only the stream is polled
    let mut cancel_closed = false;

    'batches: for batch in urls.chunks(batch_size) {
        if *cancel.borrow() {
            break;
        }

        // All probes of this batch run concurrently; buffer_unordered
        // yields outcomes in completion order, not input order
        let probes = batch.iter().map(|url| {
            let client = client.clone();
            async move { probe_url(&client, url, options).await }
        });
        let mut outcomes = stream::iter(probes).buffer_unordered(batch_size);

        // Drain serially: this loop is the single aggregation point, so
        // concurrent completions can never lose updates
        loop {
            tokio::select! {
                next = outcomes.next() => match next {
                    Some(outcome) => aggregator.ingest(outcome),
                    None => break,
                },
                changed = cancel.changed(), if !cancel_closed => match changed {
                    Ok(()) if *cancel.borrow() => break 'batches,
                    Ok(()) => {}
                    Err(_) => cancel_closed = true,
                },
            }
        }
    }

    Ok(aggregator.finalize())
}
