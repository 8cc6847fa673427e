//! Crawl statistics
//!
//! Counters collected by the coordinator during a run, and a helper to
//! display them once the crawl ends.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counters for a single crawl run
#[derive(Debug, Clone, Serialize)]
pub struct CrawlStats {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run ended (unset while running)
    pub finished_at: Option<DateTime<Utc>>,

    /// List pages fetched successfully
    pub list_pages_fetched: u64,

    /// Detail pages fetched successfully
    pub detail_pages_fetched: u64,

    /// Fetches answered with a redirect
    pub redirects: u64,

    /// Fetches that failed and were dropped
    pub fetch_failures: u64,

    /// Detail pages without a content container (no record emitted)
    pub pages_without_content: u64,

    /// Records handed to the sink
    pub records_emitted: u64,

    /// Detail links found on list pages, duplicates included
    pub detail_links_found: u64,

    /// Tasks rejected because their URL had already been queued
    pub duplicates_skipped: u64,

    /// Tasks left in the frontier when the run ended
    pub tasks_remaining: u64,

    /// Whether the run was cancelled before the frontier drained
    pub cancelled: bool,
}

impl CrawlStats {
    /// Creates zeroed statistics stamped with the current time
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            list_pages_fetched: 0,
            detail_pages_fetched: 0,
            redirects: 0,
            fetch_failures: 0,
            pages_without_content: 0,
            records_emitted: 0,
            detail_links_found: 0,
            duplicates_skipped: 0,
            tasks_remaining: 0,
            cancelled: false,
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Returns the number of fetches attempted, successful or not
    pub fn pages_attempted(&self) -> u64 {
        self.list_pages_fetched + self.detail_pages_fetched + self.redirects + self.fetch_failures
    }

    /// Returns the run duration in seconds, if finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }

    /// Returns the share of successful detail pages that produced a record
    pub fn extraction_rate(&self) -> f64 {
        if self.detail_pages_fetched == 0 {
            return 0.0;
        }
        (self.records_emitted as f64 / self.detail_pages_fetched as f64) * 100.0
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout is left to the record output.
pub fn print_statistics(stats: &CrawlStats) {
    eprintln!("=== Crawl Statistics ===\n");

    eprintln!("Run:");
    eprintln!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        eprintln!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = stats.duration_seconds() {
        eprintln!("  Duration: {:.1}s", duration);
    }
    if stats.cancelled {
        eprintln!("  Status: cancelled");
    }
    eprintln!();

    eprintln!("Pages:");
    eprintln!("  Attempted: {}", stats.pages_attempted());
    eprintln!("  List pages: {}", stats.list_pages_fetched);
    eprintln!("  Detail pages: {}", stats.detail_pages_fetched);
    eprintln!("  Redirects: {}", stats.redirects);
    eprintln!("  Failed fetches: {}", stats.fetch_failures);
    eprintln!("  Without content: {}", stats.pages_without_content);
    eprintln!();

    eprintln!("Links:");
    eprintln!("  Detail links found: {}", stats.detail_links_found);
    eprintln!("  Duplicates skipped: {}", stats.duplicates_skipped);
    if stats.tasks_remaining > 0 {
        eprintln!("  Left in frontier: {}", stats.tasks_remaining);
    }
    eprintln!();

    eprintln!(
        "Records: {} ({:.1}% of detail pages)",
        stats.records_emitted,
        stats.extraction_rate()
    );
}
