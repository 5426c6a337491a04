// src/checker/probe.rs
// =============================================================================
// This module probes a single URL and classifies the outcome.
//
// Key functionality:
// - Issues one HTTP request (HEAD by default, GET on request) with a
//   per-request timeout, following up to 5 redirects
// - Classifies the outcome: a concrete status code, or Error for any
//   network-level failure (DNS, connect, TLS, timeout, malformed response)
// - Retries exactly once on a 404, after a fixed delay; the retry's result
//   is final whatever it is
// - Measures elapsed time across the whole probe, retry delay included
//
// The worker never touches shared aggregation state; it returns an
// immutable ProbeOutcome value and the scheduler's drain loop does the
// accounting.
// =============================================================================

use reqwest::{Client, Response, StatusCode};
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Instant;

use super::domain;
use super::schedule::{CheckOptions, ProbeMethod};

/// The bucketing key for a probe outcome: a concrete HTTP status code, or
/// the Error sentinel for network-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// The response's HTTP status code (after any redirects and retry)
    Status(u16),
    /// The request failed below the HTTP layer
    Error,
}

impl StatusClass {
    /// Returns true for 2xx and 3xx classifications.
    ///
    /// Redirect statuses only surface here when the redirect chain could
    /// not be followed to a final response; they still indicate a live URL.
    pub fn is_ok(&self) -> bool {
        matches!(self, StatusClass::Status(code) if (200..400).contains(code))
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusClass::Status(code) => write!(f, "{}", code),
            StatusClass::Error => write!(f, "Error"),
        }
    }
}

// Serializes as a bare number (200) or the string "Error", so JSON output
// reads like the human-facing summary
impl Serialize for StatusClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StatusClass::Status(code) => serializer.serialize_u16(*code),
            StatusClass::Error => serializer.serialize_str("Error"),
        }
    }
}

/// The result of probing a single URL.
///
/// Produced exactly once per URL, after retry resolution, and immutable
/// from then on.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeOutcome {
    /// The URL that was requested
    pub url: String,
    /// Status code or Error
    pub classification: StatusClass,
    /// Full probe duration, including any retry delay and retry attempt
    pub elapsed_seconds: f64,
    /// The response's resolved URL after following redirects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
    /// Host (and explicit port) of the requested URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_domain: Option<String>,
    /// Host with one subdomain level stripped; see domain::normalize
    #[serde(skip_serializing_if = "Option::is_none")]
    pub true_domain: Option<String>,
}

impl ProbeOutcome {
    /// Helper method to check if the probed URL is reachable (2xx/3xx)
    pub fn is_ok(&self) -> bool {
        self.classification.is_ok()
    }
}

/// Probes one URL and classifies the outcome.
///
/// On a 404 response the probe is retried exactly once after
/// `options.retry_delay` (when `options.retry_on_404` is set); the retried
/// attempt's result is final, even if it is another 404 or a network
/// failure. Network failures are classified as Error, never returned as
/// an error to the caller.
pub async fn probe_url(client: &Client, url: &str, options: &CheckOptions) -> ProbeOutcome {
    let started = Instant::now();

    let mut attempt = send_probe(client, url, options.method).await;

    // Bounded retry: a first-response 404 gets one more chance after a
    // fixed delay, and that second answer stands
    let is_not_found = matches!(&attempt, Ok(response) if response.status() == StatusCode::NOT_FOUND);
    if is_not_found && options.retry_on_404 {
        tokio::time::sleep(options.retry_delay).await;
        attempt = send_probe(client, url, options.method).await;
    }

    // The retry delay is part of the user-visible cost, so it counts
    let elapsed_seconds = started.elapsed().as_secs_f64();

    match attempt {
        Ok(response) => {
            // Domains are derived from the URL we were asked to check,
            // not from wherever redirects landed
            let (main_domain, true_domain) = domain::normalize(url);

            ProbeOutcome {
                url: url.to_string(),
                classification: StatusClass::Status(response.status().as_u16()),
                elapsed_seconds,
                final_url: Some(response.url().to_string()),
                main_domain: Some(main_domain),
                true_domain: Some(true_domain),
            }
        }
        Err(_) => ProbeOutcome {
            url: url.to_string(),
            classification: StatusClass::Error,
            elapsed_seconds,
            final_url: None,
            main_domain: None,
            true_domain: None,
        },
    }
}

// Sends a single request with the configured method; the client carries
// the timeout and redirect policy
async fn send_probe(client: &Client, url: &str, method: ProbeMethod) -> reqwest::Result<Response> {
    match method {
        ProbeMethod::Head => client.head(url).send().await,
        ProbeMethod::Get => client.get(url).send().await,
    }
}
