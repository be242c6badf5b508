//! Todo state store.
//!
//! # Design
//! The store owns the only local copy of the todo collection. State lives in
//! a `watch` channel: every intent applies its result with `send_modify`, and
//! subscribers are woken on each change. Intents take `&self`, so several can
//! be in flight at once; results are applied in completion order and a later
//! response overwrites an earlier one.
//!
//! Nothing is applied before the server answers. A failed call leaves the
//! collection untouched and records an operation-specific message in
//! `last_error`, which stays until `clear_error` or the next `refresh`.
//!
//! `dispose` cancels every in-flight intent; results that arrive afterwards
//! are dropped. Dropping a single intent future abandons just that call.

use std::future::Future;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::gateway::TodoApi;
use crate::state::{Form, TodoState};
use crate::types::{Todo, TodoCreate, TodoUpdate};

pub const LOAD_FAILED: &str = "Failed to load todos";
pub const CREATE_FAILED: &str = "Failed to create todo";
pub const UPDATE_FAILED: &str = "Failed to update todo";
pub const TOGGLE_FAILED: &str = "Failed to toggle todo";
pub const DELETE_FAILED: &str = "Failed to delete todo";

/// What an intent did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The server accepted the call and its response was applied.
    Applied,
    /// The call failed; `last_error` was set.
    Failed,
    /// Refused before reaching the API (empty title).
    Rejected,
    /// The confirmation step said no.
    Declined,
    /// The store was disposed before the response could be applied.
    Cancelled,
}

pub struct TodoStore<A> {
    api: A,
    state: watch::Sender<TodoState>,
    lifetime: CancellationToken,
}

impl<A: TodoApi> TodoStore<A> {
    pub fn new(api: A) -> Self {
        let (state, _) = watch::channel(TodoState::default());
        Self {
            api,
            state,
            lifetime: CancellationToken::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<TodoState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> TodoState {
        self.state.borrow().clone()
    }

    /// Replace the collection with the server's list.
    pub async fn refresh(&self) -> Dispatch {
        if self.is_disposed() {
            return Dispatch::Cancelled;
        }
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        match self.dispatch(self.api.list()).await {
            None => {
                self.state.send_modify(|s| s.loading = false);
                Dispatch::Cancelled
            }
            Some(Ok(todos)) => {
                debug!(count = todos.len(), "loaded todos");
                self.state.send_modify(|s| {
                    s.todos = todos;
                    s.loading = false;
                });
                Dispatch::Applied
            }
            Some(Err(err)) => {
                warn!(error = %err, "{LOAD_FAILED}");
                self.state.send_modify(|s| {
                    s.error = Some(LOAD_FAILED.to_string());
                    s.loading = false;
                });
                Dispatch::Failed
            }
        }
    }

    pub fn begin_create(&self) {
        self.state.send_modify(|s| s.form = Form::Creating);
    }

    pub fn begin_edit(&self, todo: Todo) {
        self.state.send_modify(|s| s.form = Form::Editing(todo));
    }

    pub fn cancel_form(&self) {
        self.state.send_modify(|s| s.form = Form::Closed);
    }

    /// Create a todo, or update the one being edited.
    ///
    /// The form closes only once the server has accepted the change.
    pub async fn save(&self, data: TodoCreate) -> Dispatch {
        let data = TodoCreate::new(&data.title, data.description.as_deref());
        if !data.is_valid() {
            debug!("not saving todo with empty title");
            return Dispatch::Rejected;
        }

        let target = self.state.borrow().editing_target().map(|t| t.id);
        match target {
            Some(id) => {
                let patch = TodoUpdate::from(data);
                match self.dispatch(self.api.update(id, &patch)).await {
                    None => Dispatch::Cancelled,
                    Some(Ok(todo)) => {
                        self.state.send_modify(|s| {
                            s.replace(id, todo);
                            s.form = Form::Closed;
                        });
                        Dispatch::Applied
                    }
                    Some(Err(err)) => self.fail(UPDATE_FAILED, &err),
                }
            }
            None => match self.dispatch(self.api.create(&data)).await {
                None => Dispatch::Cancelled,
                Some(Ok(todo)) => {
                    debug!(id = todo.id, "created todo");
                    self.state.send_modify(|s| {
                        s.upsert(todo);
                        s.form = Form::Closed;
                    });
                    Dispatch::Applied
                }
                Some(Err(err)) => self.fail(CREATE_FAILED, &err),
            },
        }
    }

    /// Flip `completed` relative to the given copy of `todo`.
    pub async fn toggle(&self, todo: &Todo) -> Dispatch {
        let patch = TodoUpdate::completed(!todo.completed);
        match self.dispatch(self.api.update(todo.id, &patch)).await {
            None => Dispatch::Cancelled,
            Some(Ok(updated)) => {
                self.state.send_modify(|s| {
                    s.replace(todo.id, updated);
                });
                Dispatch::Applied
            }
            Some(Err(err)) => self.fail(TOGGLE_FAILED, &err),
        }
    }

    /// Delete `todo` once `confirm` agrees.
    pub async fn remove<F>(&self, todo: &Todo, confirm: F) -> Dispatch
    where
        F: FnOnce(&Todo) -> bool,
    {
        if !confirm(todo) {
            return Dispatch::Declined;
        }
        match self.dispatch(self.api.delete(todo.id)).await {
            None => Dispatch::Cancelled,
            Some(Ok(())) => {
                debug!(id = todo.id, "deleted todo");
                self.state.send_modify(|s| s.remove(todo.id));
                Dispatch::Applied
            }
            Some(Err(err)) => self.fail(DELETE_FAILED, &err),
        }
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Stop applying responses. Every pending and future intent resolves to
    /// `Dispatch::Cancelled`.
    pub fn dispose(&self) {
        self.lifetime.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    async fn dispatch<T>(
        &self,
        call: impl Future<Output = Result<T, ApiError>>,
    ) -> Option<Result<T, ApiError>> {
        if self.is_disposed() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.lifetime.cancelled() => {
                debug!("store disposed, dropping response");
                None
            }
            result = call => Some(result),
        }
    }

    fn fail(&self, message: &'static str, err: &ApiError) -> Dispatch {
        warn!(error = %err, "{message}");
        self.state.send_modify(|s| s.error = Some(message.to_string()));
        Dispatch::Failed
    }
}
