use crate::UrlError;
use url::Url;

/// Normalizes a URL so that equivalent spellings share one frontier key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Only HTTP and HTTPS schemes are accepted
/// 3. A host is required (the `url` crate lowercases it on parse)
/// 4. Remove fragment (everything after #)
/// 5. Sort query parameters by key, keeping the order of repeated keys
/// 6. Remove empty query string (trailing ?)
///
/// Paths are left alone: wiki titles are case- and slash-sensitive.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use jutsu_crawler::url::normalize_url;
///
/// let url = normalize_url("https://Naruto.Fandom.com/wiki/List?offset=0&limit=250#top").unwrap();
/// assert_eq!(url.as_str(), "https://naruto.fandom.com/wiki/List?limit=250&offset=0");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Normalizes an already parsed URL
///
/// See [`normalize_url`] for the rules applied.
pub fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let params = sorted_query_params(&url);

        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params);
        }
    }

    Ok(url)
}

/// Returns the key under which the frontier records a URL as seen
///
/// URLs that cannot be normalized fall back to their raw serialization.
pub fn dedupe_key(url: &Url) -> String {
    match normalize_parsed(url.clone()) {
        Ok(normalized) => normalized.into(),
        Err(_) => url.as_str().to_string(),
    }
}

/// Collects query parameters sorted by key
fn sorted_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    // Stable sort keeps repeated keys in their original order
    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}
