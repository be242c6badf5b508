//! In-memory stand-in for the todo service.
//!
//! Serves the same HTTP surface as the production backend: integer ids
//! assigned in sequence, `{"detail": ...}` error bodies, 422 for an empty
//! title, 200 with a confirmation message on delete.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// `description` is `None` when absent and `Some(None)` for an explicit
/// `null`, which clears the stored value.
#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
pub struct Page {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

pub struct TodoTable {
    todos: BTreeMap<i64, Todo>,
    next_id: i64,
}

impl Default for TodoTable {
    fn default() -> Self {
        Self {
            todos: BTreeMap::new(),
            next_id: 1,
        }
    }
}

pub type Db = Arc<RwLock<TodoTable>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(TodoTable::default()));
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "todo mock server listening");
    }
    axum::serve(listener, app()).await
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Todo not found" })))
}

fn title_too_short() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "detail": [{
                "loc": ["body", "title"],
                "msg": "String should have at least 1 character",
                "type": "string_too_short"
            }]
        })),
    )
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Todo API is running!" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn list_todos(State(db): State<Db>, Query(page): Query<Page>) -> Json<Vec<Todo>> {
    let table = db.read().await;
    Json(
        table
            .todos
            .values()
            .skip(page.skip)
            .take(page.limit)
            .cloned()
            .collect(),
    )
}

async fn create_todo(State(db): State<Db>, Json(input): Json<CreateTodo>) -> ApiResult<Json<Todo>> {
    if input.title.is_empty() {
        return Err(title_too_short());
    }
    let mut table = db.write().await;
    let todo = Todo {
        id: table.next_id,
        title: input.title,
        description: input.description,
        completed: input.completed,
    };
    table.next_id += 1;
    table.todos.insert(todo.id, todo.clone());
    debug!(id = todo.id, "created todo");
    Ok(Json(todo))
}

async fn get_todo(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<Json<Todo>> {
    let table = db.read().await;
    table.todos.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTodo>,
) -> ApiResult<Json<Todo>> {
    let mut table = db.write().await;
    let todo = table.todos.get_mut(&id).ok_or_else(not_found)?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(description) = input.description {
        todo.description = description;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    debug!(id, "updated todo");
    Ok(Json(todo.clone()))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    let mut table = db.write().await;
    table.todos.remove(&id).ok_or_else(not_found)?;
    debug!(id, "deleted todo");
    Ok(Json(json!({ "message": "Todo deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_missing_description_as_null() {
        let todo = Todo {
            id: 1,
            title: "Test".to_string(),
            description: None,
            completed: false,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "Test");
        assert!(json["description"].is_null());
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn create_todo_defaults_completed_to_false() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"No completed field"}"#).unwrap();
        assert_eq!(input.title, "No completed field");
        assert!(input.description.is_none());
        assert!(!input.completed);
    }

    #[test]
    fn create_todo_rejects_missing_title() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"description":"No title"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.description.is_none());
        assert!(input.completed.is_none());
    }

    #[test]
    fn update_todo_distinguishes_null_description() {
        let input: UpdateTodo = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(input.description, Some(None));
        let input: UpdateTodo = serde_json::from_str(r#"{"description":"x"}"#).unwrap();
        assert_eq!(input.description, Some(Some("x".to_string())));
    }

    #[test]
    fn page_defaults_match_backend() {
        let page: Page = serde_json::from_str("{}").unwrap();
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, 100);
    }

    #[test]
    fn table_ids_start_at_one() {
        assert_eq!(TodoTable::default().next_id, 1);
    }
}
