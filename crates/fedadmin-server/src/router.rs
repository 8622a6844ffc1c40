//! Router wiring.

use axum::routing::{get, post};
use axum::Router;

use fedadmin_admin::admin_router;
use fedadmin_session::SessionGateway;
use fedadmin_store::{RoleStore, UserStore};

use crate::auth;
use crate::health::health;
use crate::state::AppState;

/// Builds the full application router: health, the login path, and the
/// admin surface nested under `/admin`.
pub fn create_router<U, R, G>(state: AppState<U, R, G>) -> Router
where
    U: UserStore + 'static,
    R: RoleStore + 'static,
    G: SessionGateway + 'static,
{
    let admin = admin_router().with_state(state.admin.clone());

    Router::new()
        .route("/health", get(health))
        .route("/auth/callback", post(auth::callback::<U, R, G>))
        .route("/auth/logout", post(auth::logout::<U, R, G>))
        .with_state(state)
        .nest("/admin", admin)
}
