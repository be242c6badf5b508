//! In-memory [`TodoApi`] for exercising the store without HTTP.
//!
//! Behaves like the todo service (sequential ids, 404 on unknown ids, empty
//! titles rejected) and records every call. Failures and latency can be
//! queued per call: each call consumes at most one of each, in order.
//!
//! The result of a call is computed when the call starts and delivered after
//! its queued delay, so two overlapping calls can complete in either order.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ApiError, ErrorKind};
use crate::gateway::TodoApi;
use crate::types::{Todo, TodoCreate, TodoId, TodoUpdate};

/// One recorded call against the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    List,
    Get(TodoId),
    Create(TodoCreate),
    Update(TodoId, TodoUpdate),
    Delete(TodoId),
}

#[derive(Debug, Default)]
struct Inner {
    todos: Vec<Todo>,
    next_id: TodoId,
    calls: Vec<FakeCall>,
    failures: VecDeque<ApiError>,
    delays: VecDeque<Duration>,
}

#[derive(Debug)]
pub struct FakeTodoApi {
    inner: Mutex<Inner>,
}

impl FakeTodoApi {
    pub fn new() -> Self {
        Self::with_todos(Vec::new())
    }

    /// Start with `todos` already stored; new ids continue after the highest.
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let next_id = todos.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Self {
            inner: Mutex::new(Inner {
                todos,
                next_id,
                ..Inner::default()
            }),
        }
    }

    /// The next call fails with `error` instead of touching stored todos.
    pub fn fail_next(&self, error: ApiError) {
        self.lock().failures.push_back(error);
    }

    /// The next call delivers its result after `delay`.
    pub fn delay_next(&self, delay: Duration) {
        self.lock().delays.push_back(delay);
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.lock().calls.clone()
    }

    /// Todos as the server currently holds them.
    pub fn stored(&self) -> Vec<Todo> {
        self.lock().todos.clone()
    }

    /// Simulate a write by another client; not recorded as a call.
    pub fn insert_stored(&self, title: &str) -> Todo {
        let mut inner = self.lock();
        let todo = Todo {
            id: inner.next_id,
            title: title.to_string(),
            description: None,
            completed: false,
        };
        inner.next_id += 1;
        inner.todos.push(todo.clone());
        todo
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle<T>(
        &self,
        call: FakeCall,
        op: impl FnOnce(&mut Inner) -> Result<T, ApiError>,
    ) -> (Option<Duration>, Result<T, ApiError>) {
        let mut inner = self.lock();
        inner.calls.push(call);
        let delay = inner.delays.pop_front();
        let result = match inner.failures.pop_front() {
            Some(error) => Err(error),
            None => op(&mut *inner),
        };
        (delay, result)
    }
}

impl Default for FakeTodoApi {
    fn default() -> Self {
        Self::new()
    }
}

async fn deliver<T>((delay, result): (Option<Duration>, Result<T, ApiError>)) -> Result<T, ApiError> {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    result
}

fn not_found() -> ApiError {
    ApiError::new(ErrorKind::NotFound, "Todo not found")
}

#[async_trait]
impl TodoApi for FakeTodoApi {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        deliver(self.handle(FakeCall::List, |inner| Ok(inner.todos.clone()))).await
    }

    async fn get(&self, id: TodoId) -> Result<Todo, ApiError> {
        let outcome = self.handle(FakeCall::Get(id), |inner| {
            inner
                .todos
                .iter()
                .find(|t| t.id == id)
                .cloned()
                .ok_or_else(not_found)
        });
        deliver(outcome).await
    }

    async fn create(&self, input: &TodoCreate) -> Result<Todo, ApiError> {
        let outcome = self.handle(FakeCall::Create(input.clone()), |inner| {
            if !input.is_valid() {
                return Err(ApiError::validation("title must not be empty"));
            }
            let todo = Todo {
                id: inner.next_id,
                title: input.title.clone(),
                description: input.description.clone(),
                completed: false,
            };
            inner.next_id += 1;
            inner.todos.push(todo.clone());
            Ok(todo)
        });
        deliver(outcome).await
    }

    async fn update(&self, id: TodoId, patch: &TodoUpdate) -> Result<Todo, ApiError> {
        let outcome = self.handle(FakeCall::Update(id, patch.clone()), |inner| {
            let todo = inner
                .todos
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(not_found)?;
            if let Some(title) = &patch.title {
                todo.title = title.clone();
            }
            if let Some(description) = &patch.description {
                todo.description = Some(description.clone());
            }
            if let Some(completed) = patch.completed {
                todo.completed = completed;
            }
            Ok(todo.clone())
        });
        deliver(outcome).await
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        let outcome = self.handle(FakeCall::Delete(id), |inner| {
            let before = inner.todos.len();
            inner.todos.retain(|t| t.id != id);
            if inner.todos.len() == before {
                Err(not_found())
            } else {
                Ok(())
            }
        });
        deliver(outcome).await
    }
}
