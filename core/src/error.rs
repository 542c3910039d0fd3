//! Error types for the ProposalPage client.
//!
//! # Design
//! HTTP status codes are data, not errors: a 401 or 404 from the backend comes
//! back as an ordinary `CallResult`. `CallError` is reserved for calls that
//! could not be built, could not reach the backend, or produced a body that
//! is not JSON. "Server unreachable" (`Transport`) and "server returned
//! garbage" (`MalformedJsonResponse`) stay distinct so callers can react to
//! each.

use thiserror::Error;

/// Errors returned by the dispatcher and every typed client method.
#[derive(Debug, Error)]
pub enum CallError {
    /// The operation name is not present in the registry.
    #[error("unknown operation `{name}`")]
    UnknownOperation { name: String },

    /// A `{placeholder}` in the path template had no value. Raised before any
    /// network I/O.
    #[error("operation `{operation}` is missing path parameter `{placeholder}`")]
    MissingPathParameter {
        operation: String,
        placeholder: String,
    },

    /// The transport could not complete the round-trip.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The backend answered with a non-empty body that is not valid JSON.
    #[error("malformed JSON response (HTTP {status}): {source}")]
    MalformedJsonResponse {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be encoded as JSON.
    #[error("request serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Fieldless tag of a [`CallError`], for matching without destructuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallErrorKind {
    UnknownOperation,
    MissingPathParameter,
    TransportFailure,
    MalformedJsonResponse,
    Serialization,
}

impl CallError {
    pub fn kind(&self) -> CallErrorKind {
        match self {
            CallError::UnknownOperation { .. } => CallErrorKind::UnknownOperation,
            CallError::MissingPathParameter { .. } => CallErrorKind::MissingPathParameter,
            CallError::Transport(_) => CallErrorKind::TransportFailure,
            CallError::MalformedJsonResponse { .. } => CallErrorKind::MalformedJsonResponse,
            CallError::Serialization(_) => CallErrorKind::Serialization,
        }
    }
}

/// Failures surfaced by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection could not be established or broke mid-exchange.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The transport gave up waiting.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Only produced by transports whose contract treats non-2xx as failure.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Other(String),
}

/// Problems detected while building a [`Registry`](crate::registry::Registry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("operation `{0}` is registered twice")]
    DuplicateOperation(String),

    #[error("operation `{operation}` has a malformed path template `{template}`")]
    MalformedTemplate { operation: String, template: String },

    #[error("operation `{operation}` declares query parameters but is not a GET")]
    QueryOnNonGet { operation: String },
}
