//! Crawl task definitions
//!
//! A task is created when a URL is seeded or discovered, and consumed
//! the moment it is fetched.

use std::fmt;
use url::Url;

/// The kind of page a task points to, which decides the extractor used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// A paginated index page listing detail links
    ListPage,

    /// A single item's page holding one record
    DetailPage,
}

impl PageKind {
    /// Returns a stable, lowercase label for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListPage => "list",
            Self::DetailPage => "detail",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A URL queued for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// The URL to fetch
    pub url: Url,

    /// What kind of page lives at the URL
    pub kind: PageKind,
}

impl CrawlTask {
    /// Creates a task for a list page
    pub fn list(url: Url) -> Self {
        Self {
            url,
            kind: PageKind::ListPage,
        }
    }

    /// Creates a task for a detail page
    pub fn detail(url: Url) -> Self {
        Self {
            url,
            kind: PageKind::DetailPage,
        }
    }
}

/// Markup returned by a successful fetch
#[derive(Debug, Clone)]
pub struct RawPage {
    /// URL the markup was served from; relative links resolve against it
    pub url: Url,

    /// Response body
    pub markup: String,
}
