//! Error types for the todo API client.
//!
//! # Design
//! Every failure that leaves the gateway is an [`ApiError`]: one `kind` the
//! caller can branch on plus a human-readable `message`. `NotFound` gets a
//! dedicated kind because callers frequently distinguish "the resource does
//! not exist" from "the server returned an unexpected status".

use std::fmt;

use thiserror::Error;

/// Classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a response (connection refused, timeout, DNS).
    Transport,

    /// The server returned a non-2xx status other than 404 and 422.
    Server { status: u16 },

    /// The server returned 404, the requested todo does not exist.
    NotFound,

    /// The payload was rejected, client-side (empty title) or by a 422.
    Validation,

    /// A success response body could not be decoded into the expected type.
    Decode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::Server { status } => write!(f, "HTTP {status}"),
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::Validation => write!(f, "validation error"),
            ErrorKind::Decode => write!(f, "invalid response"),
        }
    }
}

/// Normalized error returned by every gateway operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

/// Failure of a [`Transport`](crate::transport::Transport) to obtain any
/// response at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::new(ErrorKind::Transport, err.0)
    }
}
