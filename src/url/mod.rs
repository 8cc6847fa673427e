//! URL handling module
//!
//! This module provides URL normalization for frontier deduplication and
//! resolution of hrefs found in page markup.

mod normalize;

use url::Url;

// Re-export main functions
pub use normalize::{dedupe_key, normalize_parsed, normalize_url};

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Empty and fragment-only hrefs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use jutsu_crawler::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://naruto.fandom.com/wiki/Special:BrowseData/Jutsu").unwrap();
/// let resolved = resolve_link("/wiki/Rasengan", &base).unwrap();
/// assert_eq!(resolved.as_str(), "https://naruto.fandom.com/wiki/Rasengan");
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            // Only accept HTTP and HTTPS URLs
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
