//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each CRUD operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! [`TodoGateway`](crate::gateway::TodoGateway) pairs them around a
//! transport; tests drive them directly.
//!
//! Status handling follows the server: any 2xx is success (create answers
//! 200 or 201, delete 200 or 204), 404 is `NotFound`, 422 is `Validation`,
//! everything else is `Server`. FastAPI-style `{"detail": ...}` bodies become
//! the error message.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{ApiEndpoint, TODOS_PATH};
use crate::error::{ApiError, ErrorKind};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Todo, TodoCreate, TodoId, TodoUpdate};

/// Synchronous, stateless codec for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    /// `base_url` is the API origin, e.g. `http://localhost:8000`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_endpoint(endpoint: &ApiEndpoint) -> Self {
        Self::new(&endpoint.origin())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.collection_url())
    }

    pub fn build_get_todo(&self, id: TodoId) -> HttpRequest {
        self.request(HttpMethod::Get, self.item_url(id))
    }

    /// Fails with `Validation` when the title is empty after trimming, so an
    /// invalid create never reaches the network.
    pub fn build_create_todo(&self, input: &TodoCreate) -> Result<HttpRequest, ApiError> {
        if !input.is_valid() {
            return Err(ApiError::validation("title must not be empty"));
        }
        self.json_request(HttpMethod::Post, self.collection_url(), input)
    }

    pub fn build_update_todo(&self, id: TodoId, input: &TodoUpdate) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, self.item_url(id), input)
    }

    pub fn build_delete_todo(&self, id: TodoId) -> HttpRequest {
        self.request(HttpMethod::Delete, self.item_url(id))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    /// The body of a successful delete is ignored.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn collection_url(&self) -> String {
        format!("{}{TODOS_PATH}", self.base_url)
    }

    fn item_url(&self, id: TodoId) -> String {
        format!("{}{TODOS_PATH}/{id}", self.base_url)
    }

    fn request(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        url: String,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body)
            .map_err(|e| ApiError::validation(format!("request body could not be encoded: {e}")))?;
        Ok(HttpRequest {
            method,
            url,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map non-success status codes to the appropriate `ErrorKind`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let kind = match response.status {
        404 => ErrorKind::NotFound,
        422 => ErrorKind::Validation,
        status => ErrorKind::Server { status },
    };
    Err(ApiError::new(kind, error_message(response)))
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::new(ErrorKind::Decode, e.to_string()))
}

/// Prefer the server's `detail` field; fall back to the raw body, then to
/// the status line.
fn error_message(response: &HttpResponse) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(&response.body)
        .ok()
        .and_then(|value| value.get("detail").map(detail_text));
    match detail {
        Some(text) => text,
        None if response.body.trim().is_empty() => format!("HTTP {}", response.status),
        None => response.body.clone(),
    }
}

/// Validation failures carry a list of `{"msg": ...}` objects.
fn detail_text(detail: &serde_json::Value) -> String {
    match detail {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item.get("msg").and_then(|m| m.as_str()) {
                Some(msg) => msg.to_string(),
                None => item.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}
