//! Read-only navigation helpers over the `scraper` tree.

use scraper::{ElementRef, Selector};

/// Element ancestors, nearest first, excluding the element itself
pub fn ancestors<'a>(element: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + use<'a> {
    element.ancestors().filter_map(ElementRef::wrap)
}

/// Nearest ancestor whose tag is one of `tags`
pub fn closest<'a>(element: &ElementRef<'a>, tags: &[&str]) -> Option<ElementRef<'a>> {
    ancestors(element).find(|a| tags.contains(&a.value().name()))
}

/// Descendants matching `selector` in document order, never the scope itself
pub fn select_within<'a, 'b>(
    scope: &ElementRef<'a>,
    selector: &'b Selector,
) -> impl Iterator<Item = ElementRef<'a>> + use<'a, 'b> {
    let scope_id = scope.id();
    scope.select(selector).filter(move |e| e.id() != scope_id)
}

/// First descendant matching `selector`
pub fn find_within<'a>(scope: &ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    select_within(scope, selector).next()
}

/// Class list joined with single spaces
pub fn class_list(element: &ElementRef) -> String {
    element.value().classes().collect::<Vec<_>>().join(" ")
}

/// Parse a selector known at compile time
pub(crate) fn static_selector(css: &str) -> Selector {
    Selector::parse(css).expect("built-in selector should be valid")
}
