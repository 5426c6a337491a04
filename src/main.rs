// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Read URLs from the chosen input source (text file, stdin, or CSV)
// 3. Run the bounded-concurrency check, with ctrl-c wired to cancellation
// 4. Print the detail table and summary (or JSON), export on request
// 5. Exit with proper code (0 = all reachable, 1 = failures found,
//    2 = error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - the URL checking engine
mod cli; // src/cli.rs - command-line parsing
mod export; // src/export.rs - result export to csv/json files
mod input; // src/input/ - text, stdin and CSV input reading

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;

use checker::{ProbeOutcome, RunSummary, StatusClass};
use cli::{CheckArgs, Cli, Commands};

// The #[tokio::main] attribute creates a tokio runtime and runs our async
// code inside it
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // An unexpected error occurred: print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Main application logic
// Returns:
//   Ok(0) = every URL answered 2xx/3xx
//   Ok(1) = at least one broken or unreachable URL
//   Err   = unexpected error (becomes exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Text { file, check } => {
            let text = input::read_text(file.as_deref())?;
            let urls = checker::extract_urls(&text);
            handle_check(urls, &check).await
        }
        Commands::Csv { file, check } => {
            // CSV cells run through the same extractor as text lines, so
            // junk rows are dropped before any probe is issued
            let cells = input::read_csv_links_from_path(&file)?;
            let urls = checker::extract_urls(&cells.join("\n"));
            handle_check(urls, &check).await
        }
    }
}

// Runs one check over the extracted URLs and renders the outcome
async fn handle_check(urls: Vec<String>, check: &CheckArgs) -> Result<i32> {
    if urls.is_empty() {
        println!("✅ No URLs found to check");
        return Ok(0);
    }

    let options = check.to_options()?;
    let total = urls.len();

    println!(
        "🌐 Checking {} link(s), up to {} at a time...\n",
        total,
        options.effective_batch_size()
    );

    // Ctrl-c flips the cancellation channel; the run returns with
    // whatever already completed
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    let summary = checker::check_urls_cancellable(urls, &options, cancel_rx).await?;

    if summary.total_checked < total {
        println!(
            "⚠️  Cancelled after {} of {} link(s); partial results follow\n",
            summary.total_checked, total
        );
    }

    if check.json {
        // Serialize the whole summary to JSON and print
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    if let Some(path) = &check.export {
        export::export_results(path, &summary)?;
        println!("💾 Results written to {}", path.display());
    }

    Ok(if summary.broken_count() > 0 { 1 } else { 0 })
}

// Prints the per-URL detail table followed by the aggregate views
fn print_summary(summary: &RunSummary) {
    print_detail_table(&summary.outcomes);

    println!("📊 Summary:");
    println!("   Total Links Checked: {}", summary.total_checked);
    for bucket in &summary.buckets {
        match bucket.classification {
            StatusClass::Status(code) => println!("   Status Code {}: {}", code, bucket.count),
            StatusClass::Error => println!("   Errors: {}", bucket.count),
        }
    }

    if !summary.domains.is_empty() {
        println!();
        println!("🌍 By domain:");
        println!("   {:<40} {:<8} {:>5}", "TRUE DOMAIN", "STATUS", "COUNT");
        for group in &summary.domains {
            println!(
                "   {:<40} {:<8} {:>5}",
                group.true_domain, group.classification, group.count
            );
        }
    }

    println!();
    println!(
        "⏱️  Total Time Taken: {:.2} seconds",
        summary.total_elapsed_seconds
    );
    println!(
        "⏱️  Average Time Per Link: {:.2} seconds",
        summary.average_seconds_per_url()
    );
}

// Prints results as a human-readable table in the terminal
fn print_detail_table(outcomes: &[ProbeOutcome]) {
    println!("{:<60} {:<12} {:>8}  {}", "URL", "STATUS", "TIME(S)", "FINAL URL");
    println!("{}", "=".repeat(105));

    for outcome in outcomes {
        // Truncate URL if too long for display
        let url_display = if outcome.url.chars().count() > 57 {
            let truncated: String = outcome.url.chars().take(57).collect();
            format!("{}...", truncated)
        } else {
            outcome.url.clone()
        };

        println!(
            "{:<60} {:<12} {:>8.2}  {}",
            url_display,
            format_status(outcome.classification),
            outcome.elapsed_seconds,
            outcome.final_url.as_deref().unwrap_or("")
        );
    }

    println!();
}

// Formats a classification with a status emoji
fn format_status(classification: StatusClass) -> String {
    match classification {
        StatusClass::Status(code) if (200..300).contains(&code) => format!("✅ {}", code),
        StatusClass::Status(code) if (300..400).contains(&code) => format!("🔀 {}", code),
        StatusClass::Status(code) => format!("❌ {}", code),
        StatusClass::Error => "⚠️  ERROR".to_string(),
    }
}
