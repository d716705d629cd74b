use super::dom::{self, static_selector};
use super::patterns::ACTION_PATTERNS;
use super::{AccessibilityLabels, ElementContext, ElementSemantics, Purpose};
use crate::utils::{non_empty_attr, resolve_url, stripped_text};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

/// Selectors for candidate controls, in the order they are gathered
const CANDIDATE_SELECTORS: [&str; 8] = [
    "button",
    "input",
    "a",
    "select",
    r#"[role="button"]"#,
    r#"[role="link"]"#,
    r#"[role="menuitem"]"#,
    "form",
];

static CANDIDATES: LazyLock<Vec<Selector>> =
    LazyLock::new(|| CANDIDATE_SELECTORS.iter().map(|css| static_selector(css)).collect());

static HEADINGS: LazyLock<Selector> = LazyLock::new(|| static_selector("h1, h2, h3, h4, h5, h6"));

/// Classify every candidate control on the page.
///
/// Results keep gathering order: selector by selector, document order within
/// each. An element matched by several selectors is classified once.
pub fn collect_actionable(doc: &Html, base_url: &Url) -> Vec<ElementSemantics> {
    let mut seen = HashSet::new();
    let mut actionable = Vec::new();

    for selector in CANDIDATES.iter() {
        for element in doc.select(selector) {
            if !seen.insert(element.id()) {
                continue;
            }
            let semantics = classify(&element, base_url);
            if semantics.is_actionable {
                actionable.push(semantics);
            }
        }
    }

    ::log::debug!("Classified {} actionable elements", actionable.len());
    actionable
}

/// Classify a single element
pub fn classify(element: &ElementRef, base_url: &Url) -> ElementSemantics {
    let value = element.value();
    let element_type = value.name().to_string();

    let accessibility_labels = AccessibilityLabels {
        label: value.attr("aria-label").map(String::from),
        description: value.attr("aria-description").map(String::from),
        role: value.attr("role").map(String::from),
        label_text: if value.name() == "input" {
            value.attr("label").map(String::from)
        } else {
            None
        },
    };

    ElementSemantics {
        element_type,
        purpose: infer_purpose(element),
        context: element_context(element, base_url),
        accessibility_labels,
        // Every classified control is currently actionable
        is_actionable: true,
    }
}

/// Signals used for purpose inference, highest priority first, empty ones dropped
pub fn purpose_signals(element: &ElementRef) -> Vec<String> {
    let mut signals = vec![stripped_text(element)];
    for attr in ["aria-label", "title", "placeholder", "name", "id"] {
        if let Some(value) = element.value().attr(attr) {
            signals.push(value.to_string());
        }
    }
    signals.push(dom::class_list(element));

    signals.retain(|s| !s.trim().is_empty());
    signals
}

pub fn infer_purpose(element: &ElementRef) -> Purpose {
    ACTION_PATTERNS
        .first_match(&purpose_signals(element))
        .unwrap_or(Purpose::Unknown)
}

/// Resolve where the element sits: heading, form, navigation and list membership
pub fn element_context(element: &ElementRef, base_url: &Url) -> ElementContext {
    let section_heading = dom::ancestors(element)
        .find_map(|ancestor| dom::find_within(&ancestor, &HEADINGS))
        .map(|heading| stripped_text(&heading));

    let form_name = dom::closest(element, &["form"])
        .and_then(|form| non_empty_attr(&form, "name"))
        .map(String::from);

    let url = if element.value().name() == "a" {
        resolve_url(base_url, element.value().attr("href"))
    } else {
        None
    };

    ElementContext {
        section_heading,
        form_name,
        in_navigation: dom::closest(element, &["nav"]).is_some(),
        in_list: dom::closest(element, &["ul", "ol"]).is_some(),
        url,
    }
}
