//! Where the todo API lives.
//!
//! The API is served from the same host the client runs on, on a fixed port.
//! The host is always passed in by the embedding application; nothing here
//! reads ambient process or browser state.

use std::net::IpAddr;

use serde::Deserialize;

/// Port the todo API listens on.
pub const DEFAULT_API_PORT: u16 = 8000;

/// Path of the todo collection resource.
pub const TODOS_PATH: &str = "/todos";

/// Resolved location of the todo API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiEndpoint {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl Default for ApiEndpoint {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: DEFAULT_API_PORT,
        }
    }
}

impl ApiEndpoint {
    /// Resolve the endpoint for a client running on `hostname`.
    ///
    /// Loopback hosts (and an empty hostname) map to `localhost`; any other
    /// host is kept so the client talks to the API on its own machine.
    pub fn for_host(hostname: &str) -> Self {
        let hostname = hostname.trim();
        let host = if is_loopback(hostname) {
            "localhost".to_string()
        } else {
            hostname.to_string()
        };
        Self {
            host,
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// `scheme://host:port`, without a trailing slash.
    pub fn origin(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// Absolute URL of the todo collection.
    pub fn resource_url(&self) -> String {
        format!("{}{TODOS_PATH}", self.origin())
    }
}

fn is_loopback(hostname: &str) -> bool {
    if hostname.is_empty() || hostname.eq_ignore_ascii_case("localhost") {
        return true;
    }
    let literal = hostname.trim_start_matches('[').trim_end_matches(']');
    literal
        .parse::<IpAddr>()
        .map(|ip| ip.is_loopback())
        .unwrap_or(false)
}
