//! Error types for session backends.

use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while talking to a session backend.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to open session store: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("invalid session id: {0}")]
    InvalidSessionId(String),

    #[error("backend error: {0}")]
    Backend(String),
}
