use super::dom::{self, static_selector};
use super::{FormDescriptor, InputDescriptor};
use crate::utils::{non_empty_attr, resolve_url, stripped_text};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static FORMS: LazyLock<Selector> = LazyLock::new(|| static_selector("form"));
static FIELDS: LazyLock<Selector> = LazyLock::new(|| static_selector("input, select, textarea"));
static LABELS: LazyLock<Selector> = LazyLock::new(|| static_selector("label"));

/// Every form under `scope`, in document order.
///
/// `doc` is the whole page: `<label for=...>` lookups are never limited to the
/// scope.
pub fn parse_forms(scope: &ElementRef, doc: &Html, base_url: &Url) -> Vec<FormDescriptor> {
    dom::select_within(scope, &FORMS)
        .map(|form| parse_form(&form, doc, base_url))
        .collect()
}

/// All forms of the page
pub fn parse_all_forms(doc: &Html, base_url: &Url) -> Vec<FormDescriptor> {
    doc.select(&FORMS)
        .map(|form| parse_form(&form, doc, base_url))
        .collect()
}

pub fn parse_form(form: &ElementRef, doc: &Html, base_url: &Url) -> FormDescriptor {
    let value = form.value();
    let method = value
        .attr("method")
        .map(|m| m.trim().to_ascii_lowercase())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "get".to_string());

    // An action that cannot be resolved submits to the page itself
    let action = resolve_url(base_url, value.attr("action")).unwrap_or_else(|| base_url.to_string());

    let inputs = dom::select_within(form, &FIELDS)
        .map(|field| parse_input(&field, doc))
        .collect();

    FormDescriptor {
        name: value.attr("name").map(String::from),
        id: value.attr("id").map(String::from),
        method,
        action,
        inputs,
    }
}

fn parse_input(field: &ElementRef, doc: &Html) -> InputDescriptor {
    let value = field.value();
    InputDescriptor {
        input_type: value.attr("type").unwrap_or("text").to_string(),
        name: value.attr("name").map(String::from),
        id: value.attr("id").map(String::from),
        required: value.attr("required").is_some(),
        placeholder: value.attr("placeholder").map(String::from),
        label: find_input_label(field, doc),
    }
}

/// Label text for a field: aria-label, then `<label for=id>`, then an enclosing
/// `<label>` minus the field's own text.
pub fn find_input_label(field: &ElementRef, doc: &Html) -> Option<String> {
    if let Some(aria_label) = non_empty_attr(field, "aria-label") {
        return Some(aria_label.to_string());
    }

    if let Some(id) = non_empty_attr(field, "id") {
        if let Some(label) = doc
            .select(&LABELS)
            .find(|label| label.value().attr("for") == Some(id))
        {
            return Some(stripped_text(&label));
        }
    }

    let parent_label = dom::closest(field, &["label"])?;
    let label_text = stripped_text(&parent_label);
    let field_text = stripped_text(field);
    let text = if field_text.is_empty() {
        label_text
    } else {
        label_text.replace(&field_text, "")
    };
    Some(text.trim().to_string())
}
