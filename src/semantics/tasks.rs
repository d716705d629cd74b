use super::{
    ActionCatalog, FormDescriptor, InputDescriptor, NavigationBlock, Purpose, TaskDescriptor,
};

const UNKNOWN_FORM: &str = "Unknown Form";
const SEARCH_LOCATION: &str = "search form or input field";

/// Derive the tasks a user could perform: one per form, one per navigation
/// block, and a single search task when any element searches.
pub fn derive_tasks(
    forms: &[FormDescriptor],
    navigation: &[NavigationBlock],
    actions: &ActionCatalog,
) -> Vec<TaskDescriptor> {
    let mut tasks = Vec::with_capacity(forms.len() + navigation.len() + 1);

    for form in forms {
        let (required, optional): (Vec<_>, Vec<_>) =
            form.inputs.iter().partition(|input| input.required);
        tasks.push(TaskDescriptor::FormSubmission {
            name: form.name.clone().unwrap_or_else(|| UNKNOWN_FORM.to_string()),
            requirements: field_keys(&required),
            optional_fields: field_keys(&optional),
        });
    }

    for nav in navigation {
        tasks.push(TaskDescriptor::Navigation {
            available_destinations: nav.items.iter().map(|item| item.text.clone()).collect(),
            location: nav.location,
        });
    }

    if actions.contains_key(&Purpose::Search) {
        tasks.push(TaskDescriptor::Search {
            requirements: vec!["query".to_string()],
            location: SEARCH_LOCATION.to_string(),
        });
    }

    tasks
}

/// Field names, falling back to the id; fields with neither are skipped
fn field_keys(inputs: &[&InputDescriptor]) -> Vec<String> {
    inputs
        .iter()
        .filter_map(|input| input.name.clone().or_else(|| input.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::{NavItem, NavLocation};

    fn input(name: Option<&str>, id: Option<&str>, required: bool) -> InputDescriptor {
        InputDescriptor {
            input_type: "text".into(),
            name: name.map(String::from),
            id: id.map(String::from),
            required,
            placeholder: None,
            label: None,
        }
    }

    #[test]
    fn test_form_task_partitions_required() {
        let form = FormDescriptor {
            name: None,
            id: None,
            method: "get".into(),
            action: "https://example.com/".into(),
            inputs: vec![
                input(Some("user"), None, true),
                input(None, Some("note"), false),
                input(None, None, false),
                input(Some("pass"), None, true),
            ],
        };
        let tasks = derive_tasks(&[form], &[], &ActionCatalog::new());
        assert_eq!(
            tasks,
            vec![TaskDescriptor::FormSubmission {
                name: "Unknown Form".into(),
                requirements: vec!["user".into(), "pass".into()],
                optional_fields: vec!["note".into()],
            }]
        );
    }

    #[test]
    fn test_navigation_and_search_tasks() {
        let nav = NavigationBlock {
            items: vec![NavItem {
                text: "Home".into(),
                url: "https://example.com/".into(),
            }],
            aria_label: None,
            location: NavLocation::Footer,
        };
        let mut actions = ActionCatalog::new();
        actions.insert(Purpose::Search, Vec::new());

        let tasks = derive_tasks(&[], &[nav], &actions);
        assert_eq!(
            tasks,
            vec![
                TaskDescriptor::Navigation {
                    available_destinations: vec!["Home".into()],
                    location: NavLocation::Footer,
                },
                TaskDescriptor::Search {
                    requirements: vec!["query".into()],
                    location: "search form or input field".into(),
                },
            ]
        );
    }

    #[test]
    fn test_no_search_task_without_search_action() {
        let mut actions = ActionCatalog::new();
        actions.insert(Purpose::Submit, Vec::new());
        assert!(derive_tasks(&[], &[], &actions).is_empty());
    }

    #[test]
    fn test_task_wire_format() {
        let task = TaskDescriptor::Search {
            requirements: vec!["query".into()],
            location: "search form or input field".into(),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["type"], "search");
        assert_eq!(json["requirements"][0], "query");
    }
}
