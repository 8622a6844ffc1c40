//! Login-callback and logout handlers.
//!
//! SAML envelope validation happens upstream; the callback receives the
//! authenticated assertion's claim set and runs the provisioning
//! workflow against it.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fedadmin_provision::{AssertionClaims, Disposition};
use fedadmin_session::{AuthProperties, SessionGateway};
use fedadmin_store::{RoleStore, UserStore};

use crate::state::AppState;

/// Body of the login callback: the validated claim set plus the local
/// URL to return to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackRequest {
    /// Claim values by claim type.
    #[serde(default)]
    pub claims: HashMap<String, Vec<String>>,
    /// Local URL to return to after sign-in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
}

/// Result of a completed login callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackResponse {
    /// Whether the login may proceed.
    pub authorized: bool,
    /// How the login was handled.
    pub disposition: Disposition,
    /// Id of the provisioned user.
    pub user_id: Uuid,
    /// Username of the provisioned user.
    pub username: String,
    /// Id of the established session, when authorized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    /// Validated return URL, when one was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
}

/// Request to terminate a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    /// Id of the session to terminate.
    pub session_id: Uuid,
}

/// A return URL is accepted only when it is a local path.
///
/// An external return URL is treated as a possible attack, like the
/// original flow does.
#[must_use]
pub fn is_valid_return_url(url: &str) -> bool {
    let mut chars = url.chars();
    if chars.next() != Some('/') {
        return false;
    }

    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    };

    let path_ok = path
        .chars()
        .skip(1)
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_'));
    let query_ok = query.is_none_or(|q| {
        q.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '=' | '&'))
    });

    path_ok && query_ok
}

/// POST /auth/callback - Provision the authenticated principal
pub async fn callback<U, R, G>(
    State(state): State<AppState<U, R, G>>,
    Json(request): Json<CallbackRequest>,
) -> Response
where
    U: UserStore,
    R: RoleStore,
    G: SessionGateway,
{
    if let Some(url) = &request.return_url {
        if !is_valid_return_url(url) {
            tracing::warn!(return_url = %url, "rejecting non-local return URL");
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "invalid_return_url" })),
            )
                .into_response();
        }
    }

    let assertion = AssertionClaims {
        values: request.claims,
    };
    let mut properties = AuthProperties::new(&state.config.provider);
    properties.return_url.clone_from(&request.return_url);

    match state.provisioner.provision(&assertion, &properties).await {
        Ok(outcome) => {
            let status = if outcome.is_authorized() {
                StatusCode::OK
            } else {
                // Authenticated but not yet enabled.
                StatusCode::FORBIDDEN
            };
            let body = CallbackResponse {
                authorized: outcome.is_authorized(),
                disposition: outcome.disposition,
                user_id: outcome.user.id,
                username: outcome.user.username.clone(),
                session_id: outcome.session.as_ref().map(|s| s.id),
                return_url: request.return_url,
            };
            (status, Json(body)).into_response()
        }
        Err(error) => {
            tracing::error!(%error, "provisioning failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "authentication_error" })),
            )
                .into_response()
        }
    }
}

/// POST /auth/logout - Terminate a session
pub async fn logout<U, R, G>(
    State(state): State<AppState<U, R, G>>,
    Json(request): Json<LogoutRequest>,
) -> Response
where
    U: UserStore,
    R: RoleStore,
    G: SessionGateway,
{
    match state.sessions.sign_out(request.session_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) if error.is_not_found() => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "session_not_found" })),
        )
            .into_response(),
        Err(error) => {
            tracing::error!(%error, "logout failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "logout_error" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_return_urls_are_accepted() {
        assert!(is_valid_return_url("/"));
        assert!(is_valid_return_url("/admin/users"));
        assert!(is_valid_return_url("/admin/roles?page=2&sort=name"));
    }

    #[test]
    fn external_and_malformed_return_urls_are_rejected() {
        assert!(!is_valid_return_url("https://evil.example/"));
        assert!(!is_valid_return_url("//evil.example"));
        assert!(!is_valid_return_url("admin"));
        assert!(!is_valid_return_url("/admin/<script>"));
        assert!(!is_valid_return_url("/admin?redirect=https://evil.example"));
    }
}
