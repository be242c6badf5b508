//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the server's schema but are defined independently from
//! the mock-server crate. Integration tests catch any schema drift between the
//! two. Fields the server returns but the client never reads (timestamps) are
//! ignored on decode.

use serde::{Deserialize, Serialize};

/// Server-assigned todo identifier.
pub type TodoId = i64;

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Request payload for creating a new todo.
///
/// Use [`TodoCreate::new`] to get the same normalization a form submit
/// applies: both fields trimmed, an empty description dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoCreate {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TodoCreate {
    pub fn new(title: &str, description: Option<&str>) -> Self {
        Self {
            title: title.trim().to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        }
    }

    /// `false` when the title is empty after trimming.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoUpdate {
    /// Patch that only sets the completion flag.
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }
}

impl From<TodoCreate> for TodoUpdate {
    fn from(input: TodoCreate) -> Self {
        Self {
            title: Some(input.title),
            description: input.description,
            completed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_create_trims_and_drops_empty_description() {
        let input = TodoCreate::new("  Buy milk  ", Some("   "));
        assert_eq!(input.title, "Buy milk");
        assert!(input.description.is_none());

        let input = TodoCreate::new("Walk dog", Some(" around the park "));
        assert_eq!(input.description.as_deref(), Some("around the park"));
    }

    #[test]
    fn whitespace_title_is_invalid() {
        assert!(!TodoCreate::new(" \t ", None).is_valid());
        assert!(!TodoCreate { title: "   ".to_string(), description: None }.is_valid());
        assert!(TodoCreate::new("x", None).is_valid());
    }

    #[test]
    fn todo_decodes_without_optional_fields_and_ignores_timestamps() {
        let todo: Todo = serde_json::from_str(
            r#"{"id":3,"title":"T","created_at":"2024-01-01T00:00:00","updated_at":null}"#,
        )
        .unwrap();
        assert_eq!(todo.id, 3);
        assert!(todo.description.is_none());
        assert!(!todo.completed);
    }

    #[test]
    fn toggle_patch_only_carries_completed() {
        let body = serde_json::to_value(TodoUpdate::completed(true)).unwrap();
        assert_eq!(body, serde_json::json!({"completed": true}));
    }

    #[test]
    fn edit_patch_carries_title_and_description() {
        let patch = TodoUpdate::from(TodoCreate::new("New", Some("desc")));
        let body = serde_json::to_value(patch).unwrap();
        assert_eq!(body, serde_json::json!({"title": "New", "description": "desc"}));
    }
}
