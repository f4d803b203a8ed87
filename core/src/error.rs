//! Error types for the scheduling API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the record does not exist" from "the backend rejected the request." All
//! other non-2xx responses land in `Http` with the raw status code and body,
//! which keeps any validation payload the backend attached. Transport
//! failures are split into `Timeout` and `Transport` so a page can tell a
//! slow backend from an unreachable one.

use thiserror::Error;

/// Errors returned by the client, its transport and the resource services.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The request never produced an HTTP response (connection refused,
    /// DNS failure, broken socket, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend returned 404 for the addressed record.
    #[error("resource not found")]
    NotFound,

    /// The backend returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be decoded into the expected schema.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be encoded to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The client configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// True for failures that happened before any HTTP status was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Timeout | ApiError::Transport(_))
    }
}
