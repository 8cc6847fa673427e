//! List page extraction
//!
//! A list page is one page of the paginated category listing. It yields the
//! detail links found in its result columns and, unless it is the last page,
//! a link to the next page of results.

use crate::crawler::roles::{Role, RoleLocator};
use crate::url::resolve_link;
use scraper::Html;
use url::Url;

/// Links extracted from a list page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPageLinks {
    /// Detail page URLs, in document order (not deduplicated)
    pub detail_links: Vec<Url>,

    /// The next page of results; `None` on the last page
    pub next_page: Option<Url>,
}

/// Extracts detail links and the next-page link from list page markup
///
/// # Link Extraction Rules
///
/// - Every anchor playing [`Role::ResultLinks`] is resolved against
///   `page_url` and kept in document order
/// - The first anchor playing [`Role::NextPageLink`] becomes the next page
/// - Hrefs that do not resolve to an HTTP(S) URL are skipped
///
/// # Arguments
///
/// * `html` - The list page markup
/// * `page_url` - The URL the markup was served from
/// * `locator` - Role bindings for the site's markup
///
/// # Example
///
/// ```
/// use jutsu_crawler::crawler::{extract_links, MarkupProfile};
/// use url::Url;
///
/// let html = r#"<div class="smw-columnlist-container"><div class="smw-column">
///     <a href="/wiki/Rasengan">Rasengan</a></div></div>"#;
/// let page_url = Url::parse("https://naruto.fandom.com/wiki/Special:BrowseData/Jutsu").unwrap();
/// let links = extract_links(html, &page_url, &MarkupProfile::fandom().unwrap());
/// assert_eq!(links.detail_links[0].as_str(), "https://naruto.fandom.com/wiki/Rasengan");
/// assert!(links.next_page.is_none());
/// ```
pub fn extract_links<L: RoleLocator + ?Sized>(
    html: &str,
    page_url: &Url,
    locator: &L,
) -> ListPageLinks {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let detail_links = locator
        .find_all_by_role(root, Role::ResultLinks)
        .into_iter()
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let resolved = resolve_link(href, page_url);
            if resolved.is_none() {
                tracing::debug!("Skipping unresolvable result link '{}' on {}", href, page_url);
            }
            resolved
        })
        .collect();

    let next_page = locator
        .find_by_role(root, Role::NextPageLink)
        .and_then(|anchor| anchor.value().attr("href"))
        .and_then(|href| resolve_link(href, page_url));

    ListPageLinks {
        detail_links,
        next_page,
    }
}
