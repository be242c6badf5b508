//! Client-side synchronization layer for a remote todo list.
//!
//! # Overview
//! [`TodoStore`] keeps the local copy of the todo collection, exposes it as
//! observable [`TodoState`] snapshots, and reconciles user intents (save,
//! toggle, remove) with the server through a [`TodoApi`].
//!
//! # Design
//! - [`TodoClient`] is a stateless codec: `build_*` produces an
//!   [`HttpRequest`], `parse_*` interprets an [`HttpResponse`]. No I/O.
//! - A [`Transport`] executes requests; [`ReqwestTransport`] is the default.
//! - [`TodoGateway`] joins the two and implements [`TodoApi`];
//!   [`FakeTodoApi`] implements it in memory.
//! - Every failure is normalized to [`ApiError`] before reaching the store.
//! - The API host is injected through [`ApiEndpoint`].
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod fake;
pub mod gateway;
pub mod http;
pub mod state;
pub mod store;
pub mod transport;
pub mod types;

pub use client::TodoClient;
pub use config::{ApiEndpoint, DEFAULT_API_PORT};
pub use error::{ApiError, ErrorKind, TransportError};
pub use fake::{FakeCall, FakeTodoApi};
pub use gateway::{TodoApi, TodoGateway};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use state::{Form, TodoState};
pub use store::{Dispatch, TodoStore};
pub use transport::Transport;
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use types::{Todo, TodoCreate, TodoId, TodoUpdate};
