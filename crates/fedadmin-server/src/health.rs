//! Health endpoint with build information.

use axum::Json;
use serde::{Deserialize, Serialize};

/// Health response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall status; always `healthy` when the server answers.
    pub status: String,
    /// Service name.
    pub name: String,
    /// Crate version.
    pub version: String,
    /// Git commit the binary was built from, when the build exposed it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_sha: Option<String>,
}

/// GET /health - Liveness plus build info
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_sha: option_env!("FEDADMIN_GIT_SHA").map(ToString::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_name_and_version() {
        let response = health().await;

        assert_eq!(response.status, "healthy");
        assert_eq!(response.name, "fedadmin-server");
        assert!(!response.version.is_empty());
    }
}
