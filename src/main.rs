//! Jutsu Crawler main entry point
//!
//! This is the command-line interface for the jutsu listing crawler.

use anyhow::Context;
use clap::Parser;
use jutsu_crawler::config::{load_config_with_hash, validate, Config, OutputFormat};
use jutsu_crawler::crawler::run_crawl;
use jutsu_crawler::output::print_statistics;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Jutsu Crawler: walks a wiki category listing and extracts jutsu records
///
/// Every detail page linked from the listing is fetched once; each page
/// with article content yields one record (name, classification,
/// description) written as JSON.
#[derive(Parser, Debug)]
#[command(name = "jutsu-crawler")]
#[command(version = "1.0.0")]
#[command(about = "Crawls a wiki jutsu listing into JSON records", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listing URL to start from
    #[arg(long, value_name = "URL")]
    seed: Option<String>,

    /// Write records to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Record output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Maximum number of concurrent requests
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Stop dispatching after this many pages
    #[arg(long, value_name = "N")]
    max_pages: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the effective settings without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout stays free for records.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("jutsu_crawler=info,warn"),
            1 => EnvFilter::new("jutsu_crawler=debug,info"),
            2 => EnvFilter::new("jutsu_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line flags on top of the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(seed) = &cli.seed {
        config.crawler.seed_url = seed.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = Some(output.clone());
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_requests = concurrency;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = Some(max_pages);
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Jutsu Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    match config.crawler.max_pages {
        Some(max_pages) => println!("  Max pages: {}", max_pages),
        None => println!("  Max pages: unlimited"),
    }

    println!("\nHTTP:");
    println!("  User-Agent: {}", config.http.user_agent);
    println!("  Request timeout: {}s", config.http.request_timeout);
    println!("  Connect timeout: {}s", config.http.connect_timeout);

    println!("\nOutput:");
    println!(
        "  Destination: {}",
        config.output.path.as_deref().unwrap_or("stdout")
    );
    println!("  Format: {:?}", config.output.format);

    println!("\nSelectors:");
    println!("  Title: {}", config.selectors.title);
    println!("  Title fallback: {}", config.selectors.title_fallback);
    println!("  Content: {}", config.selectors.content);
    println!("  Infobox: {}", config.selectors.infobox);
    println!("  Result links: {}", config.selectors.result_links);
    println!("  Next page: {}", config.selectors.next_page);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            ctrl_c_token.cancel();
        }
    });

    let stats = run_crawl(&config, cancel).await.context("Crawl failed")?;

    if stats.cancelled {
        tracing::warn!("Crawl was interrupted before the listing was exhausted");
    } else {
        tracing::info!("Crawl completed successfully");
    }

    print_statistics(&stats);

    Ok(())
}
