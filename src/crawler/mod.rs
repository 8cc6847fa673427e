//! Crawler module for fetching and processing wiki pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a browser User-Agent
//! - Role-based markup lookup
//! - List page and detail page extraction
//! - The frontier and overall crawl coordination

mod coordinator;
mod detail_page;
mod fetcher;
mod frontier;
mod list_page;
mod roles;

pub use coordinator::{Coordinator, CrawlSettings};
pub use detail_page::{extract_record, truncate_description, CLASSIFICATION_LABEL, SECTION_MARKERS};
pub use fetcher::{build_http_client, fetch_url, FetchResult, HttpFetcher, PageFetcher};
pub use frontier::Frontier;
pub use list_page::{extract_links, ListPageLinks};
pub use roles::{MarkupProfile, Role, RoleLocator};

use crate::config::Config;
use crate::output::{open_sink, CrawlStats};
use crate::CrawlerError;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and compile the selectors
/// 2. Open the configured output
/// 3. Crawl from the seed URL until the listing is exhausted
/// 4. Close the output and return the statistics
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
/// * `cancel` - Stops the crawl early when triggered
///
/// # Returns
///
/// * `Ok(CrawlStats)` - Crawl completed or was cancelled
/// * `Err(CrawlerError)` - Setup or output failed
pub async fn run_crawl(
    config: &Config,
    cancel: CancellationToken,
) -> Result<CrawlStats, CrawlerError> {
    let seed = Url::parse(&config.crawler.seed_url)?;
    let coordinator = Coordinator::from_config(config)?.with_cancel_token(cancel);
    let mut sink = open_sink(&config.output)?;

    coordinator.run(seed, &mut sink).await
}
