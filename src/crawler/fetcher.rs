//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured browser User-Agent
//! - GET requests to fetch page markup
//! - Reporting redirects instead of following them
//! - Error classification (status, timeout, connection)
//!
//! There is no retry: a failed fetch is reported once and the crawler drops
//! the task. Redirect targets go back through the frontier, so a page
//! reached under two URLs is still fetched once.

use crate::config::HttpConfig;
use crate::model::RawPage;
use crate::url::resolve_link;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success(RawPage),

    /// The server redirected to another fetchable URL
    Redirect {
        /// The HTTP status code (3xx)
        status_code: u16,

        /// The `Location` target, resolved against the requested URL
        location: Url,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,

        /// Whether the request hit the client timeout
        timed_out: bool,
    },
}

impl FetchResult {
    /// Returns true if the fetch produced markup
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Describes a failed fetch for logging
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success(_) | Self::Redirect { .. } => None,
            Self::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            Self::NetworkError { error, .. } => Some(error.clone()),
        }
    }
}

/// Fetches raw markup for a URL
///
/// Implementations must never panic on network trouble; every failure is
/// reported through [`FetchResult`].
pub trait PageFetcher: Send + Sync + 'static {
    fn fetch(&self, url: &Url) -> impl Future<Output = FetchResult> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration (User-Agent and timeouts)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use jutsu_crawler::config::HttpConfig;
/// use jutsu_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout))
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .redirect(Policy::none()) // Redirects are routed through the frontier
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wraps an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from configuration and wraps it
    pub fn from_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult {
        fetch_url(&self.client, url.as_str()).await
    }
}

/// Fetches a URL and classifies the outcome
///
/// # Outcome Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with readable body | Success |
/// | 3xx with a fetchable `Location` | Redirect |
/// | Any other status | HttpError |
/// | Timeout | NetworkError (timed_out) |
/// | Connection refused / DNS / TLS | NetworkError |
/// | Body read failure | NetworkError |
///
/// The client must not follow redirects itself (see [`build_http_client`]);
/// otherwise the returned page carries the final URL.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();

            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|location| resolve_link(location, response.url()));

                return match location {
                    Some(location) => FetchResult::Redirect {
                        status_code: status.as_u16(),
                        location,
                    },
                    None => FetchResult::HttpError {
                        status_code: status.as_u16(),
                    },
                };
            }

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            let final_url = response.url().clone();

            match response.text().await {
                Ok(markup) => FetchResult::Success(RawPage {
                    url: final_url,
                    markup,
                }),
                Err(e) => FetchResult::NetworkError {
                    error: format!("Failed to read body: {}", e),
                    timed_out: e.is_timeout(),
                },
            }
        }
        Err(e) => {
            if e.is_timeout() {
                FetchResult::NetworkError {
                    error: "Request timeout".to_string(),
                    timed_out: true,
                }
            } else if e.is_connect() {
                FetchResult::NetworkError {
                    error: "Connection refused".to_string(),
                    timed_out: false,
                }
            } else {
                FetchResult::NetworkError {
                    error: e.to_string(),
                    timed_out: false,
                }
            }
        }
    }
}
