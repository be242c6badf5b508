//! Remote todo gateway.
//!
//! [`TodoApi`] is the seam the store depends on. [`TodoGateway`] implements
//! it over HTTP by pairing the [`TodoClient`] codec with a [`Transport`];
//! [`FakeTodoApi`](crate::fake::FakeTodoApi) implements it in memory.
//! Every failure crossing this boundary is an [`ApiError`].

use async_trait::async_trait;
use tracing::debug;

use crate::client::TodoClient;
use crate::config::ApiEndpoint;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{Todo, TodoCreate, TodoId, TodoUpdate};

#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Todo>, ApiError>;

    async fn get(&self, id: TodoId) -> Result<Todo, ApiError>;

    async fn create(&self, input: &TodoCreate) -> Result<Todo, ApiError>;

    async fn update(&self, id: TodoId, patch: &TodoUpdate) -> Result<Todo, ApiError>;

    async fn delete(&self, id: TodoId) -> Result<(), ApiError>;

    /// Flip `completed` by reading the todo, writing the negated flag and
    /// reading it back.
    ///
    /// Not atomic: a write by another client between the read and the update
    /// is overwritten.
    async fn toggle(&self, id: TodoId) -> Result<Todo, ApiError> {
        let current = self.get(id).await?;
        self.update(id, &TodoUpdate::completed(!current.completed))
            .await?;
        self.get(id).await
    }
}

/// HTTP implementation of [`TodoApi`].
#[derive(Debug, Clone)]
pub struct TodoGateway<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> TodoGateway<T> {
    pub fn new(endpoint: &ApiEndpoint, transport: T) -> Self {
        Self::with_client(TodoClient::from_endpoint(endpoint), transport)
    }

    pub fn with_client(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "todo api request");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "todo api response");
        Ok(response)
    }
}

#[async_trait]
impl<T: Transport> TodoApi for TodoGateway<T> {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.send(self.client.build_list_todos()).await?;
        self.client.parse_list_todos(response)
    }

    async fn get(&self, id: TodoId) -> Result<Todo, ApiError> {
        let response = self.send(self.client.build_get_todo(id)).await?;
        self.client.parse_get_todo(response)
    }

    async fn create(&self, input: &TodoCreate) -> Result<Todo, ApiError> {
        let request = self.client.build_create_todo(input)?;
        let response = self.send(request).await?;
        self.client.parse_create_todo(response)
    }

    async fn update(&self, id: TodoId, patch: &TodoUpdate) -> Result<Todo, ApiError> {
        let request = self.client.build_update_todo(id, patch)?;
        let response = self.send(request).await?;
        self.client.parse_update_todo(response)
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_todo(id)).await?;
        self.client.parse_delete_todo(response)
    }
}
