//! Semantic extraction over a parsed page.
//!
//! The pipeline classifies every interactive control, aggregates the page into
//! headings, regions, navigation blocks and forms, then derives an action
//! catalog and a list of tasks a user could perform on the page.

pub mod classifier;
pub mod dom;
pub mod forms;
pub mod links;
pub mod navigation;
pub mod patterns;
pub mod sections;
pub mod structure;
pub mod tasks;


use crate::results::PageAnalysis;
use indexmap::IndexMap;
use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

/// Inferred intent of an interactive element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Submit,
    Search,
    Navigate,
    Delete,
    Edit,
    Form,
    Login,
    Register,
    Download,
    Upload,
    Unknown,
}

/// Inferred role of a page region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionPurpose {
    Header,
    Footer,
    Sidebar,
    Main,
    Navigation,
    Search,
    Login,
    Form,
    Unknown,
}

/// Where an element sits in the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementContext {
    /// Text of the nearest heading found while walking up the ancestors
    pub section_heading: Option<String>,
    /// `name` of the enclosing form
    pub form_name: Option<String>,
    pub in_navigation: bool,
    pub in_list: bool,
    /// Absolute target for hyperlinks
    pub url: Option<String>,
}

/// Accessibility attributes captured as-is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibilityLabels {
    pub label: Option<String>,
    pub description: Option<String>,
    pub role: Option<String>,
    /// Legacy `label` attribute, inputs only
    pub label_text: Option<String>,
}

/// Classification result for one interactive element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSemantics {
    pub element_type: String,
    pub purpose: Purpose,
    pub context: ElementContext,
    pub accessibility_labels: AccessibilityLabels,
    pub is_actionable: bool,
}

/// Entry of the action catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSummary {
    pub element_type: String,
    pub context: ElementContext,
    pub accessibility: AccessibilityLabels,
}

/// Actionable elements bucketed by purpose, buckets in first-seen order
pub type ActionCatalog = IndexMap<Purpose, Vec<ActionSummary>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub text: String,
    pub level: u8,
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub alt: String,
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDescriptor {
    #[serde(rename = "type")]
    pub input_type: String,
    pub name: Option<String>,
    pub id: Option<String>,
    pub required: bool,
    pub placeholder: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDescriptor {
    pub name: Option<String>,
    pub id: Option<String>,
    pub method: String,
    pub action: String,
    pub inputs: Vec<InputDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionContent {
    pub text_content: String,
    pub links: Vec<Link>,
    pub images: Vec<Image>,
    pub forms: Vec<FormDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSection {
    pub heading: Option<String>,
    pub purpose: SectionPurpose,
    pub has_interactive_elements: bool,
    pub content: SectionContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub text: String,
    pub url: String,
}

/// Structural landmark a navigation block lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavLocation {
    Header,
    Footer,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationBlock {
    pub items: Vec<NavItem>,
    pub aria_label: Option<String>,
    pub location: NavLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainContent {
    pub headings: Vec<Heading>,
    pub sections: Vec<PageSection>,
}

/// Page-level semantic description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticStructure {
    pub title: Option<String>,
    pub main_content: MainContent,
    pub navigation: Vec<NavigationBlock>,
    pub forms: Vec<FormDescriptor>,
}

/// Something a user could do on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskDescriptor {
    FormSubmission {
        name: String,
        requirements: Vec<String>,
        optional_fields: Vec<String>,
    },
    Navigation {
        available_destinations: Vec<String>,
        location: NavLocation,
    },
    Search {
        requirements: Vec<String>,
        location: String,
    },
}

/// Run the whole extraction pipeline over serialized markup
pub fn analyze_document(html: &str, base_url: &Url) -> PageAnalysis {
    let doc = Html::parse_document(html);

    let elements = classifier::collect_actionable(&doc, base_url);
    let actions = structure::build_action_catalog(&elements);
    let structure = structure::build_structure(&doc, base_url);
    let possible_tasks = tasks::derive_tasks(&structure.forms, &structure.navigation, &actions);
    let all_links = links::extract_links(&doc, base_url);

    ::log::debug!(
        "Analyzed {}: {} actionable elements, {} links, {} tasks",
        base_url,
        elements.len(),
        all_links.len(),
        possible_tasks.len()
    );

    PageAnalysis {
        actions,
        structure,
        possible_tasks,
        all_links,
    }
}
