//! Full login-path tests driven through the application router.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use fedadmin_model::claim_types;
use fedadmin_server::{create_router, AppState, ServerConfig};
use fedadmin_session::{MemorySessions, SessionGateway};
use fedadmin_store::MemoryStore;
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestEnv {
    store: Arc<MemoryStore>,
    sessions: Arc<MemorySessions>,
    state: AppState<MemoryStore, MemoryStore, MemorySessions>,
}

impl TestEnv {
    fn new(config: ServerConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let sessions = Arc::new(MemorySessions::new());
        let state = AppState::new(
            config,
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&sessions),
        );
        Self {
            store,
            sessions,
            state,
        }
    }

    fn app(&self) -> Router {
        create_router(self.state.clone())
    }
}

fn callback_body(external_id: &str) -> Value {
    let mut claims = serde_json::Map::new();
    claims.insert(claim_types::NAME_ID.to_string(), json!([external_id]));
    claims.insert(claim_types::GIVEN_NAME.to_string(), json!(["Alice"]));
    claims.insert(claim_types::SURNAME.to_string(), json!(["Smith"]));
    claims.insert(
        claim_types::EMAIL.to_string(),
        json!(["alice@example.com"]),
    );
    claims.insert(claim_types::SESSION_INDEX.to_string(), json!(["sid-42"]));

    json!({ "claims": claims })
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoint_answers() {
    let env = TestEnv::new(ServerConfig::for_testing());

    let response = env
        .app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["name"], "fedadmin-server");
}

#[tokio::test]
async fn development_login_provisions_and_signs_in() {
    let env = TestEnv::new(ServerConfig::for_testing());

    let response = env
        .app()
        .oneshot(post_json("/auth/callback", &callback_body("ext-1234")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["authorized"], true);
    assert_eq!(body["disposition"], "CREATED");
    assert_eq!(body["username"], "ext-1234");
    assert!(body["sessionId"].is_string());
    assert_eq!(env.store.user_count(), 1);
    assert_eq!(env.sessions.session_count(), 1);

    // The user shows up in the admin listing.
    let response = env
        .app()
        .oneshot(
            Request::builder()
                .uri("/admin/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let users = body_json(response).await;
    assert_eq!(users[0]["username"], "ext-1234");
    assert_eq!(users[0]["isEnabled"], true);
}

#[tokio::test]
async fn production_login_is_forbidden_until_enabled() {
    let mut config = ServerConfig::for_testing();
    config.development_mode = false;
    let env = TestEnv::new(config);

    let response = env
        .app()
        .oneshot(post_json("/auth/callback", &callback_body("ext-1234")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["authorized"], false);

    // The account was still provisioned, just not signed in.
    assert_eq!(env.store.user_count(), 1);
    assert_eq!(env.sessions.session_count(), 0);
}

#[tokio::test]
async fn second_login_refreshes_instead_of_creating() {
    let env = TestEnv::new(ServerConfig::for_testing());

    let first = env
        .app()
        .oneshot(post_json("/auth/callback", &callback_body("ext-1234")))
        .await
        .unwrap();
    assert_eq!(body_json(first).await["disposition"], "CREATED");

    let second = env
        .app()
        .oneshot(post_json("/auth/callback", &callback_body("ext-1234")))
        .await
        .unwrap();
    let body = body_json(second).await;
    assert_eq!(body["disposition"], "REFRESHED");
    assert_eq!(env.store.user_count(), 1);
}

#[tokio::test]
async fn non_local_return_url_is_rejected() {
    let env = TestEnv::new(ServerConfig::for_testing());
    let mut body = callback_body("ext-1234");
    body["returnUrl"] = json!("https://evil.example/phish");

    let response = env
        .app()
        .oneshot(post_json("/auth/callback", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(env.store.user_count(), 0);
}

#[tokio::test]
async fn logout_terminates_the_session() {
    let env = TestEnv::new(ServerConfig::for_testing());

    let response = env
        .app()
        .oneshot(post_json("/auth/callback", &callback_body("ext-1234")))
        .await
        .unwrap();
    let session_id = body_json(response).await["sessionId"]
        .as_str()
        .unwrap()
        .to_string();

    let response = env
        .app()
        .oneshot(post_json(
            "/auth/logout",
            &json!({ "sessionId": session_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // A second logout no longer finds an active session by index, but
    // the id-addressed sign-out stays idempotent at the gateway level.
    let gone = env
        .sessions
        .find_by_session_index("saml2", "sid-42")
        .await
        .unwrap();
    assert!(gone.is_none());
}

#[tokio::test]
async fn unknown_session_logout_is_not_found() {
    let env = TestEnv::new(ServerConfig::for_testing());

    let response = env
        .app()
        .oneshot(post_json(
            "/auth/logout",
            &json!({ "sessionId": uuid::Uuid::now_v7() }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
