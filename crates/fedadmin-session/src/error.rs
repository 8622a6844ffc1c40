//! Session error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur in the sign-in subsystem.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Session not found.
    #[error("session not found: {0}")]
    NotFound(Uuid),

    /// Sign-in was rejected by the subsystem.
    #[error("sign-in rejected: {0}")]
    Rejected(String),

    /// Internal error.
    #[error("internal session error: {0}")]
    Internal(String),
}

impl SessionError {
    /// Checks if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
