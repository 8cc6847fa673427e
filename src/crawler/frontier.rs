//! Crawl frontier: pending tasks plus the set of URLs already seen
//!
//! The frontier is owned by a single crawl run. Tasks come out in the order
//! they were discovered, and a URL is recorded as seen the moment it is
//! queued, so it can never be queued or fetched twice.

use crate::model::CrawlTask;
use crate::url::dedupe_key;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// FIFO queue of pending crawl tasks with URL deduplication
#[derive(Debug, Default)]
pub struct Frontier {
    /// Tasks waiting to be fetched, in discovery order
    queue: VecDeque<CrawlTask>,

    /// Normalized keys of every URL ever queued
    seen: HashSet<String>,

    /// Number of tasks rejected because their URL was already seen
    duplicates: u64,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding a single seed task
    pub fn seeded(seed: CrawlTask) -> Self {
        let mut frontier = Self::new();
        frontier.push(seed);
        frontier
    }

    /// Queues a task unless its URL has been seen before
    ///
    /// # Returns
    ///
    /// `true` if the task was queued, `false` if it was a duplicate
    pub fn push(&mut self, task: CrawlTask) -> bool {
        if !self.seen.insert(dedupe_key(&task.url)) {
            self.duplicates += 1;
            tracing::trace!("Skipping already seen URL: {}", task.url);
            return false;
        }

        self.queue.push_back(task);
        true
    }

    /// Queues several tasks in order, returning how many were accepted
    pub fn extend<I>(&mut self, tasks: I) -> usize
    where
        I: IntoIterator<Item = CrawlTask>,
    {
        let mut accepted = 0;
        for task in tasks {
            if self.push(task) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Takes the oldest pending task
    pub fn pop(&mut self) -> Option<CrawlTask> {
        self.queue.pop_front()
    }

    /// Returns true if the URL has been queued at some point
    pub fn has_seen(&self, url: &Url) -> bool {
        self.seen.contains(&dedupe_key(url))
    }

    /// Returns the number of pending tasks
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether no tasks are pending
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of distinct URLs ever queued
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Returns the number of duplicate tasks rejected so far
    pub fn duplicates(&self) -> u64 {
        self.duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageKind;

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://naruto.fandom.com{}", path)).unwrap()
    }

    #[test]
    fn test_new_frontier() {
        let frontier = Frontier::new();
        assert!(frontier.is_empty());
        assert_eq!(frontier.len(), 0);
        assert_eq!(frontier.seen_count(), 0);
    }

    #[test]
    fn test_seeded_frontier() {
        let mut frontier = Frontier::seeded(CrawlTask::list(url("/list?offset=0")));
        assert_eq!(frontier.len(), 1);

        let task = frontier.pop().unwrap();
        assert_eq!(task.kind, PageKind::ListPage);
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new();
        frontier.push(CrawlTask::detail(url("/wiki/A")));
        frontier.push(CrawlTask::detail(url("/wiki/B")));
        frontier.push(CrawlTask::list(url("/list?offset=250")));

        let order: Vec<String> = std::iter::from_fn(|| frontier.pop())
            .map(|task| task.url.path().to_string())
            .collect();
        assert_eq!(order, vec!["/wiki/A", "/wiki/B", "/list"]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut frontier = Frontier::new();
        assert!(frontier.push(CrawlTask::detail(url("/wiki/Rasengan"))));
        assert!(!frontier.push(CrawlTask::detail(url("/wiki/Rasengan#Trivia"))));

        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.duplicates(), 1);
    }

    #[test]
    fn test_duplicate_rejected_after_pop() {
        let mut frontier = Frontier::new();
        frontier.push(CrawlTask::detail(url("/wiki/Rasengan")));
        frontier.pop();

        assert!(!frontier.push(CrawlTask::detail(url("/wiki/Rasengan"))));
        assert!(frontier.is_empty());
        assert!(frontier.has_seen(&url("/wiki/Rasengan")));
    }

    #[test]
    fn test_same_url_different_kind_is_duplicate() {
        let mut frontier = Frontier::new();
        assert!(frontier.push(CrawlTask::list(url("/wiki/Chidori"))));
        assert!(!frontier.push(CrawlTask::detail(url("/wiki/Chidori"))));
    }

    #[test]
    fn test_extend_counts_accepted() {
        let mut frontier = Frontier::new();
        let accepted = frontier.extend(vec![
            CrawlTask::detail(url("/wiki/A")),
            CrawlTask::detail(url("/wiki/B")),
            CrawlTask::detail(url("/wiki/A")),
        ]);

        assert_eq!(accepted, 2);
        assert_eq!(frontier.len(), 2);
        assert_eq!(frontier.seen_count(), 2);
    }
}
