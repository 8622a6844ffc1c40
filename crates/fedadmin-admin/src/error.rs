//! Admin error types and HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use fedadmin_store::StoreError;

use crate::validate::ValidationErrors;

/// Errors surfaced by the admin workflows.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Referenced entity not found.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        /// Type of entity (e.g., "User", "Role").
        entity_type: &'static str,
        /// Referenced identifier.
        id: String,
    },

    /// Unique constraint violation.
    #[error("{entity_type} already exists: {field} '{value}'")]
    Conflict {
        /// Type of entity.
        entity_type: &'static str,
        /// Field that caused the conflict.
        field: &'static str,
        /// Conflicting value.
        value: String,
    },

    /// Request failed its precondition checks.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The identity store rejected an operation.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AdminError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a not found error for a uuid.
    #[must_use]
    pub fn not_found_id(entity_type: &'static str, id: Uuid) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(
        entity_type: &'static str,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::Conflict {
            entity_type,
            field,
            value: value.into(),
        }
    }

    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Store(err) => match err {
                StoreError::NotFound { .. } | StoreError::NotFoundByName { .. } => {
                    StatusCode::NOT_FOUND
                }
                StoreError::Duplicate { .. } => StatusCode::CONFLICT,
                StoreError::InvalidData(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::Validation(_) => "validation_error",
            Self::Store(_) => "store_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error: String,
    /// Human-readable error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let details = match &self {
            Self::Validation(errors) => serde_json::to_value(&errors.failures).ok(),
            _ => None,
        };
        let body = ErrorResponse {
            error: self.error_code().to_string(),
            error_description: Some(self.to_string()),
            details,
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for admin operations.
pub type AdminResult<T> = Result<T, AdminError>;
