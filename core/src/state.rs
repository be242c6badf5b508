//! Snapshot of everything the presentation layer renders.
//!
//! Derived views (`pending`, `completed`, `total`) are recomputed from the
//! collection on every call and never stored alongside it.

use crate::types::{Todo, TodoId};

/// Form visibility: closed, open for a new todo, or open to edit one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Form {
    #[default]
    Closed,
    Creating,
    Editing(Todo),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoState {
    pub(crate) todos: Vec<Todo>,
    pub(crate) loading: bool,
    pub(crate) error: Option<String>,
    pub(crate) form: Form,
}

impl TodoState {
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_visible(&self) -> bool {
        self.form != Form::Closed
    }

    pub fn editing_target(&self) -> Option<&Todo> {
        match &self.form {
            Form::Editing(todo) => Some(todo),
            _ => None,
        }
    }

    pub fn pending(&self) -> Vec<&Todo> {
        self.todos.iter().filter(|t| !t.completed).collect()
    }

    pub fn completed(&self) -> Vec<&Todo> {
        self.todos.iter().filter(|t| t.completed).collect()
    }

    pub fn total(&self) -> usize {
        self.todos.len()
    }

    pub fn find(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Replace the entry with the same id, or append when there is none.
    pub(crate) fn upsert(&mut self, todo: Todo) {
        match self.todos.iter_mut().find(|t| t.id == todo.id) {
            Some(slot) => *slot = todo,
            None => self.todos.push(todo),
        }
    }

    /// Replace the entry whose id is `id`. Returns `false` if it is gone.
    pub(crate) fn replace(&mut self, id: TodoId, todo: Todo) -> bool {
        match self.todos.iter_mut().find(|t| t.id == id) {
            Some(slot) => {
                *slot = todo;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove(&mut self, id: TodoId) {
        self.todos.retain(|t| t.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: TodoId, completed: bool) -> Todo {
        Todo {
            id,
            title: format!("todo {id}"),
            description: None,
            completed,
        }
    }

    #[test]
    fn derived_views_partition_the_collection() {
        let state = TodoState {
            todos: vec![todo(1, false), todo(2, true), todo(3, false)],
            ..TodoState::default()
        };
        assert_eq!(state.pending().len(), 2);
        assert_eq!(state.completed().len(), 1);
        assert_eq!(state.pending().len() + state.completed().len(), state.total());
        assert_eq!(state.completed()[0].id, 2);
    }

    #[test]
    fn upsert_keeps_ids_unique() {
        let mut state = TodoState::default();
        state.upsert(todo(1, false));
        state.upsert(todo(2, false));
        state.upsert(todo(1, true));
        assert_eq!(state.total(), 2);
        assert_eq!(state.todos()[0], todo(1, true));
    }

    #[test]
    fn replace_ignores_unknown_ids() {
        let mut state = TodoState {
            todos: vec![todo(1, false)],
            ..TodoState::default()
        };
        assert!(!state.replace(9, todo(9, true)));
        assert_eq!(state.todos(), &[todo(1, false)]);
    }

    #[test]
    fn replace_targets_the_requested_id() {
        let mut state = TodoState {
            todos: vec![todo(1, false), todo(2, false)],
            ..TodoState::default()
        };
        assert!(state.replace(1, todo(3, true)));
        assert_eq!(state.todos(), &[todo(3, true), todo(2, false)]);
    }

    #[test]
    fn form_flags_follow_form_state() {
        let mut state = TodoState::default();
        assert!(!state.form_visible());
        state.form = Form::Creating;
        assert!(state.form_visible());
        assert!(state.editing_target().is_none());
        state.form = Form::Editing(todo(4, false));
        assert_eq!(state.editing_target().map(|t| t.id), Some(4));
    }
}
