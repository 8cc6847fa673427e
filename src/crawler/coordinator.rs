//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns one crawl run end to end:
//! - Seeding the frontier with the listing URL
//! - Dispatching fetches with bounded concurrency
//! - Routing fetched markup to the list or detail extractor
//! - Sending redirect targets back through the frontier
//! - Enqueueing discovered links and pushing records to the sink
//! - Stopping on an empty frontier, a page budget, or cancellation

use crate::config::{Config, CrawlerConfig};
use crate::crawler::detail_page::extract_record;
use crate::crawler::fetcher::{FetchResult, HttpFetcher, PageFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::list_page::{extract_links, ListPageLinks};
use crate::crawler::roles::MarkupProfile;
use crate::model::{CrawlTask, JutsuRecord, PageKind};
use crate::output::{ChannelSink, CrawlStats, RecordSink};
use crate::CrawlerError;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Completed pages between progress log lines
const PROGRESS_INTERVAL: u64 = 50;

/// Limits applied to a crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Maximum number of fetches in flight at once
    pub max_concurrent_requests: usize,

    /// Maximum number of fetches dispatched over the whole run
    pub max_pages: Option<u64>,
}

impl CrawlSettings {
    /// Reads the limits from the `[crawler]` section
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_concurrent_requests: config.max_concurrent_requests.max(1) as usize,
            max_pages: config.max_pages,
        }
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

/// What a finished fetch task hands back to the coordinator loop
#[derive(Debug)]
enum TaskOutcome {
    Failed { task: CrawlTask, reason: String },
    Redirected { task: CrawlTask, target: Url },
    Listing { task: CrawlTask, links: ListPageLinks },
    Detail { task: CrawlTask, record: Option<JutsuRecord> },
}

/// Main crawler coordinator structure
pub struct Coordinator<F: PageFetcher> {
    fetcher: Arc<F>,
    profile: Arc<MarkupProfile>,
    settings: CrawlSettings,
    cancel: CancellationToken,
}

impl Coordinator<HttpFetcher> {
    /// Builds an HTTP-backed coordinator from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Client built and selectors compiled
    /// * `Err(CrawlerError)` - Client construction or selector compilation failed
    pub fn from_config(config: &Config) -> Result<Self, CrawlerError> {
        let fetcher = HttpFetcher::from_config(&config.http)?;
        let profile = MarkupProfile::from_config(&config.selectors)?;

        Ok(Self::new(
            fetcher,
            profile,
            CrawlSettings::from_config(&config.crawler),
        ))
    }
}

impl<F: PageFetcher> Coordinator<F> {
    /// Creates a coordinator over any page fetcher
    pub fn new(fetcher: F, profile: MarkupProfile, settings: CrawlSettings) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            profile: Arc::new(profile),
            settings,
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the token used to cancel the run
    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns a handle that cancels the run when triggered
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the crawl from a listing URL until the frontier drains
    ///
    /// # Crawl Loop
    ///
    /// 1. Top up in-flight fetches from the frontier, up to the concurrency limit
    /// 2. Wait for the next fetch to complete (or for cancellation)
    /// 3. Failed fetch: log and drop; redirect: queue the target as the same kind of page
    /// 4. List page: enqueue its detail links, then its next page
    /// 5. Detail page: hand the record, if any, to the sink
    /// 6. Stop when nothing is pending and nothing is in flight
    ///
    /// # Arguments
    ///
    /// * `seed` - The first list page
    /// * `sink` - Receives every extracted record
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStats)` - The run ended (possibly cancelled)
    /// * `Err(CrawlerError)` - The sink failed
    pub async fn run<S: RecordSink + ?Sized>(
        &self,
        seed: Url,
        sink: &mut S,
    ) -> Result<CrawlStats, CrawlerError> {
        tracing::info!("Starting crawl from {}", seed);

        let mut stats = CrawlStats::start();
        let mut frontier = Frontier::seeded(CrawlTask::list(seed));
        let mut in_flight: JoinSet<TaskOutcome> = JoinSet::new();
        let mut dispatched: u64 = 0;

        loop {
            if self.cancel.is_cancelled() {
                stats.cancelled = true;
                break;
            }

            while in_flight.len() < self.settings.max_concurrent_requests
                && !self.budget_spent(dispatched)
            {
                let Some(task) = frontier.pop() else {
                    break;
                };

                tracing::debug!("Fetching {} page {}", task.kind, task.url);
                dispatched += 1;
                in_flight.spawn(process_task(
                    Arc::clone(&self.fetcher),
                    Arc::clone(&self.profile),
                    task,
                ));
            }

            if in_flight.is_empty() {
                break;
            }

            tokio::select! {
                biased;

                () = self.cancel.cancelled() => {
                    stats.cancelled = true;
                    break;
                }
                joined = in_flight.join_next() => match joined {
                    Some(Ok(outcome)) => {
                        self.handle_outcome(outcome, &mut frontier, sink, &mut stats)?;

                        let completed = stats.pages_attempted();
                        if completed > 0 && completed % PROGRESS_INTERVAL == 0 {
                            tracing::info!(
                                "Progress: {} pages done, {} records, {} in frontier, {} in flight",
                                completed,
                                stats.records_emitted,
                                frontier.len(),
                                in_flight.len()
                            );
                        }
                    }
                    Some(Err(e)) => {
                        stats.fetch_failures += 1;
                        tracing::error!("Fetch task failed to complete: {}", e);
                    }
                    None => {}
                },
            }
        }

        if stats.cancelled {
            tracing::warn!(
                "Crawl cancelled, abandoning {} in-flight fetches",
                in_flight.len()
            );
            in_flight.abort_all();
            while in_flight.join_next().await.is_some() {}
        } else if self.budget_spent(dispatched) && !frontier.is_empty() {
            tracing::warn!(
                "Page limit of {} reached with {} tasks still queued",
                dispatched,
                frontier.len()
            );
        }

        stats.duplicates_skipped = frontier.duplicates();
        stats.tasks_remaining = frontier.len() as u64;
        sink.finish()?;
        stats.finish();

        tracing::info!(
            "Crawl finished: {} records from {} detail pages ({} failed fetches)",
            stats.records_emitted,
            stats.detail_pages_fetched,
            stats.fetch_failures
        );

        Ok(stats)
    }

    fn budget_spent(&self, dispatched: u64) -> bool {
        self.settings
            .max_pages
            .is_some_and(|max_pages| dispatched >= max_pages)
    }

    fn handle_outcome<S: RecordSink + ?Sized>(
        &self,
        outcome: TaskOutcome,
        frontier: &mut Frontier,
        sink: &mut S,
        stats: &mut CrawlStats,
    ) -> Result<(), CrawlerError> {
        match outcome {
            TaskOutcome::Failed { task, reason } => {
                stats.fetch_failures += 1;
                tracing::warn!("Dropping {} page {}: {}", task.kind, task.url, reason);
            }
            TaskOutcome::Redirected { task, target } => {
                stats.redirects += 1;

                let redirected = CrawlTask {
                    url: target,
                    kind: task.kind,
                };
                if frontier.push(redirected) {
                    tracing::debug!("{} redirects to new URL, queued", task.url);
                } else {
                    tracing::debug!("{} redirects to an already seen URL, dropped", task.url);
                }
            }
            TaskOutcome::Listing { task, links } => {
                stats.list_pages_fetched += 1;
                stats.detail_links_found += links.detail_links.len() as u64;

                let found = links.detail_links.len();
                let queued = frontier.extend(links.detail_links.into_iter().map(CrawlTask::detail));
                tracing::debug!(
                    "List page {} yielded {} detail links ({} new)",
                    task.url,
                    found,
                    queued
                );

                match links.next_page {
                    Some(next) => {
                        tracing::debug!("Next list page: {}", next);
                        frontier.push(CrawlTask::list(next));
                    }
                    None => tracing::info!("No next page after {}, pagination complete", task.url),
                }
            }
            TaskOutcome::Detail { task, record } => {
                stats.detail_pages_fetched += 1;

                match record {
                    Some(record) => {
                        tracing::trace!("Extracted '{}' from {}", record.name, task.url);
                        sink.accept(record)?;
                        stats.records_emitted += 1;
                    }
                    None => {
                        stats.pages_without_content += 1;
                        tracing::debug!("No content container on {}, skipping", task.url);
                    }
                }
            }
        }

        Ok(())
    }
}

impl<F: PageFetcher> Coordinator<F> {
    /// Runs the crawl on a background task, streaming records over a channel
    ///
    /// The receiver yields records as they are extracted and closes when the
    /// crawl ends. Dropping the receiver stops the crawl with
    /// [`OutputError::ChannelClosed`](crate::output::OutputError::ChannelClosed).
    pub fn spawn_stream(
        self,
        seed: Url,
    ) -> (
        mpsc::UnboundedReceiver<JutsuRecord>,
        JoinHandle<Result<CrawlStats, CrawlerError>>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            let mut sink = ChannelSink::new(tx);
            self.run(seed, &mut sink).await
        });

        (rx, handle)
    }
}

/// Fetches one task and runs the matching extractor on the markup
async fn process_task<F: PageFetcher>(
    fetcher: Arc<F>,
    profile: Arc<MarkupProfile>,
    task: CrawlTask,
) -> TaskOutcome {
    let page = match fetcher.fetch(&task.url).await {
        FetchResult::Success(page) => page,
        FetchResult::Redirect { location, .. } => {
            return TaskOutcome::Redirected {
                task,
                target: location,
            };
        }
        failure => {
            let reason = failure
                .failure_reason()
                .unwrap_or_else(|| "unknown failure".to_string());
            return TaskOutcome::Failed { task, reason };
        }
    };

    match task.kind {
        PageKind::ListPage => {
            let links = extract_links(&page.markup, &page.url, profile.as_ref());
            TaskOutcome::Listing { task, links }
        }
        PageKind::DetailPage => {
            let record = extract_record(&page.markup, profile.as_ref());
            TaskOutcome::Detail { task, record }
        }
    }
}
