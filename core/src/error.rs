//! Error types for the task API client.
//!
//! # Design
//! Three kinds reach the user: `Validation` (caught before any request),
//! `Request` (the server answered with a non-2xx status) and `Transport`
//! (no response at all). Their `Display` output is exactly the text shown in
//! the error banner. The (de)serialization variants cover schema drift.

/// Errors returned by `TaskClient` and `TaskManager`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Input rejected locally; no request was issued.
    #[error("{0}")]
    Validation(String),

    /// The server returned a non-2xx status. `message` is the body's `error`
    /// field when present, otherwise a generic fallback.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// The request never produced a response (backend unreachable, DNS, ...).
    #[error("{0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status of a `Request` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}
