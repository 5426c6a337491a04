// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI structure is described with Rust
// structs and attributes, and clap generates the parsing code.
//
// Both subcommands share the same check flags through a flattened
// CheckArgs struct, which also knows how to turn itself into the core's
// CheckOptions.
// =============================================================================

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::checker::{CheckOptions, ProbeMethod};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "url-sentinel",
    version = "0.1.0",
    about = "A CLI tool to check the reachability and HTTP status of batches of URLs",
    long_about = "url-sentinel probes a batch of URLs with bounded concurrency and reports \
                  per-URL status, counts per status code, domain-grouped summaries, and \
                  timing statistics."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

// This enum defines our subcommands (text, csv) - one per input source
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check every URL found in free-form text
    ///
    /// Example: url-sentinel text urls.txt --concurrency 20
    Text {
        /// Text file with one URL somewhere per line; reads stdin when omitted
        file: Option<PathBuf>,

        #[command(flatten)]
        check: CheckArgs,
    },

    /// Check every URL in the 'link' column of a CSV file
    ///
    /// Example: url-sentinel csv links.csv --export results.csv
    Csv {
        /// CSV file with a 'link' column (other columns are ignored)
        file: PathBuf,

        #[command(flatten)]
        check: CheckArgs,
    },
}

// Flags shared by every subcommand
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Maximum number of in-flight probes
    #[arg(long, default_value_t = 50)]
    pub concurrency: usize,

    /// Batch width override; defaults to the concurrency value
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Per-request timeout in seconds (fractions allowed)
    #[arg(long, default_value_t = 10.0)]
    pub timeout: f64,

    /// Do not retry URLs that answer 404
    #[arg(long)]
    pub no_retry: bool,

    /// Seconds to wait before the single 404 retry
    #[arg(long, default_value_t = 5.0)]
    pub retry_delay: f64,

    /// Probe with GET instead of HEAD
    #[arg(long)]
    pub get: bool,

    /// Output the full summary as JSON instead of tables
    #[arg(long)]
    pub json: bool,

    /// Write detailed results to a file (.csv or .json)
    #[arg(long)]
    pub export: Option<PathBuf>,
}

impl CheckArgs {
    /// Converts the parsed flags into the core's CheckOptions.
    pub fn to_options(&self) -> Result<CheckOptions> {
        Ok(CheckOptions {
            concurrency: self.concurrency,
            batch_size: self.batch_size,
            timeout: seconds(self.timeout, "--timeout")?,
            retry_on_404: !self.no_retry,
            retry_delay: seconds(self.retry_delay, "--retry-delay")?,
            method: if self.get {
                ProbeMethod::Get
            } else {
                ProbeMethod::Head
            },
        })
    }
}

// Durations cannot be negative or non-finite, so the conversion can fail
fn seconds(value: f64, flag: &str) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| anyhow!("{flag} must be a non-negative number of seconds"))
}
