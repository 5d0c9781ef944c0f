//! Error types for the server.

use std::fmt;
use thiserror::Error;

/// Which collection a record lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    User,
    Post,
    Comment,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::User => write!(f, "User"),
            RecordKind::Post => write!(f, "Post"),
            RecordKind::Comment => write!(f, "Comment"),
        }
    }
}

/// Main error type for server operations.
///
/// Every variant is a caller-visible rejection of a single request. A failed
/// operation leaves the store untouched and publishes nothing.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    #[error("Email is already in use: {0}")]
    Conflict(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Subscription rejected: {0}")]
    SubscriptionRejected(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ServerError {
    /// Missing-record error for `kind` and `id`.
    pub(crate) fn not_found(kind: RecordKind, id: &str) -> Self {
        ServerError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(e: serde_json::Error) -> Self {
        ServerError::Serialization(e.to_string())
    }
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;
