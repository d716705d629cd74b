use scraper::ElementRef;
use url::Url;

/// Text of an element with every fragment trimmed and empty fragments dropped
pub fn stripped_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a possibly relative reference against the page URL.
///
/// An absent reference resolves to the base itself.
pub fn resolve_url(base: &Url, reference: Option<&str>) -> Option<String> {
    let reference = reference.unwrap_or("").trim();
    match base.join(reference) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(e) => {
            ::log::trace!("Could not resolve {:?} against {}: {}", reference, base, e);
            None
        }
    }
}

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Attribute value, treating an empty value as absent
pub fn non_empty_attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name).filter(|v| !v.trim().is_empty())
}
