use super::links::page_title;
use super::navigation::parse_navigation;
use super::sections::{extract_headings, extract_sections, main_container};
use super::{
    ActionCatalog, ActionSummary, ElementSemantics, MainContent, SemanticStructure, forms,
};
use scraper::Html;
use url::Url;

/// Assemble the page-level structure: title, main content, navigation and forms
pub fn build_structure(doc: &Html, base_url: &Url) -> SemanticStructure {
    let main_content = match main_container(doc) {
        Some(main) => MainContent {
            headings: extract_headings(&main),
            sections: extract_sections(&main, doc, base_url),
        },
        None => MainContent::default(),
    };

    SemanticStructure {
        title: page_title(doc),
        main_content,
        navigation: parse_navigation(doc, base_url),
        forms: forms::parse_all_forms(doc, base_url),
    }
}

/// Bucket classified elements by purpose, keeping encounter order in each bucket
pub fn build_action_catalog(elements: &[ElementSemantics]) -> ActionCatalog {
    let mut catalog = ActionCatalog::new();
    for semantics in elements.iter().filter(|s| s.is_actionable) {
        catalog
            .entry(semantics.purpose)
            .or_default()
            .push(ActionSummary {
                element_type: semantics.element_type.clone(),
                context: semantics.context.clone(),
                accessibility: semantics.accessibility_labels.clone(),
            });
    }
    catalog
}
