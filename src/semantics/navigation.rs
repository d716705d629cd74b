use super::dom::{self, static_selector};
use super::{NavItem, NavLocation, NavigationBlock};
use crate::utils::{resolve_url, stripped_text};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static NAV_LANDMARKS: LazyLock<Selector> =
    LazyLock::new(|| static_selector(r#"nav, [role="navigation"]"#));
static ANCHORS: LazyLock<Selector> = LazyLock::new(|| static_selector("a"));

/// One block per navigation landmark, in document order
pub fn parse_navigation(doc: &Html, base_url: &Url) -> Vec<NavigationBlock> {
    doc.select(&NAV_LANDMARKS)
        .map(|nav| NavigationBlock {
            items: dom::select_within(&nav, &ANCHORS)
                .filter_map(|a| {
                    Some(NavItem {
                        text: stripped_text(&a),
                        url: resolve_url(base_url, a.value().attr("href"))?,
                    })
                })
                .collect(),
            aria_label: nav.value().attr("aria-label").map(String::from),
            location: nav_location(&nav),
        })
        .collect()
}

/// Header ancestry is checked before footer ancestry
pub fn nav_location(nav: &ElementRef) -> NavLocation {
    if dom::closest(nav, &["header"]).is_some() {
        NavLocation::Header
    } else if dom::closest(nav, &["footer"]).is_some() {
        NavLocation::Footer
    } else {
        NavLocation::Other
    }
}
