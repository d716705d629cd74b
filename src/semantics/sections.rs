use super::dom::{self, static_selector};
use super::forms;
use super::patterns::SECTION_PATTERNS;
use super::{Heading, Image, Link, PageSection, SectionContent, SectionPurpose};
use crate::utils::{resolve_url, stripped_text, truncate_chars};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static MAIN: LazyLock<Selector> = LazyLock::new(|| static_selector("main"));
static BODY: LazyLock<Selector> = LazyLock::new(|| static_selector("body"));
static HEADINGS: LazyLock<Selector> = LazyLock::new(|| static_selector("h1, h2, h3, h4, h5, h6"));
static CONTAINERS: LazyLock<Selector> = LazyLock::new(|| static_selector("section, article, div"));
static INTERACTIVE: LazyLock<Selector> =
    LazyLock::new(|| static_selector("button, input, a, select"));
static ANCHORS: LazyLock<Selector> = LazyLock::new(|| static_selector("a"));
static IMAGES: LazyLock<Selector> = LazyLock::new(|| static_selector("img"));

/// Characters of region text considered for purpose inference
const PURPOSE_TEXT_CHARS: usize = 100;

/// The `<main>` landmark, else `<body>`
pub fn main_container(doc: &Html) -> Option<ElementRef<'_>> {
    doc.select(&MAIN)
        .next()
        .or_else(|| doc.select(&BODY).next())
}

/// Every heading under the container, in document order
pub fn extract_headings(container: &ElementRef) -> Vec<Heading> {
    dom::select_within(container, &HEADINGS)
        .filter_map(|heading| {
            let level = heading
                .value()
                .name()
                .chars()
                .last()
                .and_then(|c| c.to_digit(10))?;
            Some(Heading {
                text: stripped_text(&heading),
                level: level as u8,
                id: heading.value().attr("id").map(String::from),
            })
        })
        .collect()
}

/// Section, article and div containers whose role mentions "region"
pub fn extract_sections(container: &ElementRef, doc: &Html, base_url: &Url) -> Vec<PageSection> {
    dom::select_within(container, &CONTAINERS)
        .filter(|candidate| {
            candidate
                .value()
                .attr("role")
                .is_some_and(|role| role.contains("region"))
        })
        .map(|section| PageSection {
            heading: dom::find_within(&section, &HEADINGS).map(|h| stripped_text(&h)),
            purpose: infer_section_purpose(&section),
            has_interactive_elements: dom::find_within(&section, &INTERACTIVE).is_some(),
            content: extract_section_content(&section, doc, base_url),
        })
        .collect()
}

/// Signals: class list, id, role, then the start of the text
pub fn infer_section_purpose(section: &ElementRef) -> SectionPurpose {
    let value = section.value();
    let text = stripped_text(section);
    let signals = [
        dom::class_list(section),
        value.attr("id").unwrap_or_default().to_string(),
        value.attr("role").unwrap_or_default().to_string(),
        truncate_chars(&text, PURPOSE_TEXT_CHARS).to_string(),
    ];

    SECTION_PATTERNS
        .first_match(&signals)
        .unwrap_or(SectionPurpose::Unknown)
}

pub fn extract_section_content(section: &ElementRef, doc: &Html, base_url: &Url) -> SectionContent {
    let links = dom::select_within(section, &ANCHORS)
        .filter_map(|a| {
            Some(Link {
                text: stripped_text(&a),
                href: resolve_url(base_url, a.value().attr("href"))?,
            })
        })
        .collect();

    let images = dom::select_within(section, &IMAGES)
        .filter_map(|img| {
            Some(Image {
                alt: img.value().attr("alt").unwrap_or_default().to_string(),
                src: resolve_url(base_url, img.value().attr("src"))?,
            })
        })
        .collect();

    SectionContent {
        text_content: stripped_text(section),
        links,
        images,
        forms: forms::parse_forms(section, doc, base_url),
    }
}
