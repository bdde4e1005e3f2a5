//! Seedwave main entry point
//!
//! Command-line front end for the batch crawl dispatcher. The presentation
//! layer here only collects the raw input URLs and prints report lines.

use clap::Parser;
use seedwave::config::{load_config_with_hash, Config};
use seedwave::output::StdoutSink;
use seedwave::url::{canonical_key, validate_url};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Seedwave: a batched seed-URL crawl dispatcher
///
/// Validates, normalizes, and deduplicates a batch of seed URLs, then
/// dispatches each admitted URL to the crawl engine under a bounded
/// concurrency budget, reporting per-URL fetch latency and traversal
/// outcomes.
#[derive(Parser, Debug)]
#[command(name = "seedwave")]
#[command(version)]
#[command(about = "A batched seed-URL crawl dispatcher", long_about = None)]
struct Cli {
    /// Seed URLs (separate by spaces and limit to 25)
    #[arg(value_name = "URLS")]
    urls: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the maximum number of in-flight fetches
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Override the per-fetch deadline in seconds
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Validate and normalize the input without any network work
    #[arg(long)]
    lint: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Load configuration, or run on defaults when no file is given.
    let mut config = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!(
                "Loaded configuration from {} (hash: {})",
                path.display(),
                hash
            );
            config
        }
        None => Config::default(),
    };

    if let Some(n) = cli.concurrency {
        config.dispatch.max_in_flight = n;
    }
    if let Some(secs) = cli.timeout_secs {
        config.dispatch.fetch_timeout_secs = secs;
    }

    // Each positional argument may itself hold several whitespace-separated
    // URLs, matching the raw input string a form field would produce.
    let input = cli.urls.join(" ");
    if input.split_whitespace().next().is_none() {
        println!("Please enter at least one valid URL.");
        return Ok(());
    }

    if cli.lint {
        handle_lint(&input);
        return Ok(());
    }

    let summary = seedwave::run_batch(config, &input, Box::new(StdoutSink)).await?;
    tracing::info!(
        "Batch finished: {} admitted, {} duplicates, {} invalid",
        summary.admitted,
        summary.duplicates,
        summary.invalid
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seedwave=info,warn"),
            1 => EnvFilter::new("seedwave=debug,info"),
            2 => EnvFilter::new("seedwave=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --lint mode: validation and normalization only, no network
fn handle_lint(input: &str) {
    for candidate in input.split_whitespace() {
        println!("url: {}", candidate);
        for issue in validate_url(candidate) {
            println!("{}", issue);
        }
        match canonical_key(candidate) {
            Ok(key) => println!("canonical: {} (mirror: {})", key, key.toggled()),
            Err(e) => println!("Invalid URL: {} ({})", candidate, e),
        }
    }
}
