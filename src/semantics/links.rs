use super::dom::static_selector;
use crate::utils::{resolve_url, stripped_text};
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

static LINKS: LazyLock<Selector> = LazyLock::new(|| static_selector("a[href]"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| static_selector("title"));

/// Every `a[href]` on the page as an absolute URL, in document order
pub fn extract_links(doc: &Html, base_url: &Url) -> Vec<String> {
    let links = doc
        .select(&LINKS)
        .filter_map(|a| resolve_url(base_url, a.value().attr("href")))
        .collect::<Vec<String>>();

    ::log::debug!("Found {} links in {}", links.len(), base_url);
    if !links.is_empty() {
        ::log::trace!(
            "First few links: {:?}",
            links.iter().take(5).collect::<Vec<_>>()
        );
    }

    links
}

/// Text of the first `<title>`, if it has any
pub fn page_title(doc: &Html) -> Option<String> {
    doc.select(&TITLE)
        .next()
        .map(|title| stripped_text(&title))
        .filter(|title| !title.is_empty())
}
