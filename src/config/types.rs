use serde::Deserialize;

/// Listing the crawl starts from when no seed is configured
pub const DEFAULT_SEED_URL: &str =
    "https://naruto.fandom.com/wiki/Special:BrowseData/Jutsu?limit=250&offset=0&_cat=Jutsu";

/// Desktop browser identifier; the wiki host rejects default client agents
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure
///
/// Every section is optional; missing sections fall back to the jutsu
/// listing crawl.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
    pub selectors: SelectorConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// The category listing the crawl starts from
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum number of fetches in flight at once
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: u32,

    /// Optional cap on the number of pages fetched
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: DEFAULT_SEED_URL.to_string(),
            max_concurrent_requests: 8,
            max_pages: None,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Overall per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout")]
    pub connect_timeout: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: 30,
            connect_timeout: 10,
        }
    }
}

/// Record output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    #[serde(rename = "json-lines")]
    #[value(name = "json-lines")]
    JsonLines,

    /// A single JSON array
    #[serde(rename = "json")]
    #[value(name = "json")]
    Json,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File records are written to; stdout when unset
    pub path: Option<String>,

    /// Serialization format for records
    pub format: OutputFormat,
}

/// CSS selectors for each markup role
///
/// Defaults match the fandom wiki skin.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub title: String,

    #[serde(rename = "title-fallback")]
    pub title_fallback: String,

    pub content: String,

    pub infobox: String,

    #[serde(rename = "infobox-row")]
    pub infobox_row: String,

    #[serde(rename = "infobox-label")]
    pub infobox_label: String,

    #[serde(rename = "infobox-value")]
    pub infobox_value: String,

    /// Class that marks infobox containers; such elements survive noise stripping
    #[serde(rename = "infobox-class")]
    pub infobox_class: String,

    #[serde(rename = "result-links")]
    pub result_links: String,

    #[serde(rename = "next-page")]
    pub next_page: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            title: "h1#firstHeading".to_string(),
            title_fallback: "span.mw-page-title-main".to_string(),
            content: "div.mw-parser-output".to_string(),
            infobox: "aside.portable-infobox".to_string(),
            infobox_row: "div.pi-data".to_string(),
            infobox_label: "h3.pi-data-label, div.pi-data-label".to_string(),
            infobox_value: "div.pi-data-value".to_string(),
            infobox_class: "portable-infobox".to_string(),
            result_links: ".smw-columnlist-container .smw-column a[href]".to_string(),
            next_page: "a.mw-nextlink[href]".to_string(),
        }
    }
}
