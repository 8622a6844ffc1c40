//! Axum router for the admin REST surface.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use uuid::Uuid;

use fedadmin_store::{RoleStore, UserStore};

use crate::actor::Actor;
use crate::commands::DeleteRole;
use crate::dto::{
    CreateRoleRequest, RoleRepresentation, RoleUsersEditRequest, RoleUsersRepresentation,
    UserDetailsRepresentation, UserRepresentation, UserRolesEditRequest, UserRolesRepresentation,
};
use crate::error::{AdminError, AdminResult};
use crate::report::SyncReport;
use crate::state::AdminState;

/// GET /users - List all users
async fn list_users<U, R>(
    State(state): State<AdminState<U, R>>,
) -> AdminResult<Json<Vec<UserRepresentation>>>
where
    U: UserStore,
    R: RoleStore,
{
    let users = state.service().list_users().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// GET /users/{id} - User detail view
async fn user_details<U, R>(
    State(state): State<AdminState<U, R>>,
    Path(id): Path<Uuid>,
) -> AdminResult<Json<UserDetailsRepresentation>>
where
    U: UserStore,
    R: RoleStore,
{
    let details = state
        .service()
        .user_details(id)
        .await?
        .ok_or_else(|| AdminError::not_found_id("User", id))?;

    Ok(Json(details.into()))
}

/// GET /users/{id}/roles - Partition roles by the user's membership
async fn user_roles<U, R>(
    State(state): State<AdminState<U, R>>,
    Path(id): Path<Uuid>,
) -> AdminResult<Json<UserRolesRepresentation>>
where
    U: UserStore,
    R: RoleStore,
{
    let partition = state
        .service()
        .user_roles(id)
        .await?
        .ok_or_else(|| AdminError::not_found_id("User", id))?;

    Ok(Json(partition.into()))
}

/// POST /users/{id}/roles - Edit the user's roles and enabled flag
async fn edit_user_roles<U, R>(
    State(state): State<AdminState<U, R>>,
    Path(id): Path<Uuid>,
    actor: Actor,
    Json(request): Json<UserRolesEditRequest>,
) -> AdminResult<Json<SyncReport>>
where
    U: UserStore,
    R: RoleStore,
{
    let report = state
        .service()
        .sync_user_roles(&actor, request.into_command(id))
        .await?;

    Ok(Json(report))
}

/// GET /roles - List all roles
async fn list_roles<U, R>(
    State(state): State<AdminState<U, R>>,
) -> AdminResult<Json<Vec<RoleRepresentation>>>
where
    U: UserStore,
    R: RoleStore,
{
    let roles = state.service().list_roles().await?;
    Ok(Json(roles.into_iter().map(Into::into).collect()))
}

/// POST /roles - Create a role
async fn create_role<U, R>(
    State(state): State<AdminState<U, R>>,
    actor: Actor,
    Json(request): Json<CreateRoleRequest>,
) -> AdminResult<impl IntoResponse>
where
    U: UserStore,
    R: RoleStore,
{
    let role = state.service().create_role(&actor, request.into()).await?;
    let location = format!("/admin/roles/{}", role.id);

    Ok((
        StatusCode::CREATED,
        [("Location", location)],
        Json(RoleRepresentation::from(role)),
    ))
}

/// DELETE /roles/{id} - Delete a role
async fn delete_role<U, R>(
    State(state): State<AdminState<U, R>>,
    Path(id): Path<Uuid>,
    actor: Actor,
) -> AdminResult<impl IntoResponse>
where
    U: UserStore,
    R: RoleStore,
{
    state
        .service()
        .delete_role(&actor, DeleteRole { id })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /roles/{id}/users - Partition users by role membership
async fn role_users<U, R>(
    State(state): State<AdminState<U, R>>,
    Path(id): Path<Uuid>,
) -> AdminResult<Json<RoleUsersRepresentation>>
where
    U: UserStore,
    R: RoleStore,
{
    let partition = state
        .service()
        .role_members(id)
        .await?
        .ok_or_else(|| AdminError::not_found_id("Role", id))?;

    Ok(Json(partition.into()))
}

/// POST /roles/{id}/users - Edit the role's members
async fn edit_role_users<U, R>(
    State(state): State<AdminState<U, R>>,
    Path(id): Path<Uuid>,
    actor: Actor,
    Json(request): Json<RoleUsersEditRequest>,
) -> AdminResult<Json<SyncReport>>
where
    U: UserStore,
    R: RoleStore,
{
    let report = state
        .service()
        .sync_role_members(&actor, request.into_command(id))
        .await?;

    Ok(Json(report))
}

/// Creates the admin router. Mount it under the admin path prefix.
pub fn admin_router<U, R>() -> Router<AdminState<U, R>>
where
    U: UserStore + 'static,
    R: RoleStore + 'static,
{
    Router::new()
        .route("/users", get(list_users::<U, R>))
        .route("/users/{id}", get(user_details::<U, R>))
        .route("/users/{id}/roles", get(user_roles::<U, R>))
        .route("/users/{id}/roles", post(edit_user_roles::<U, R>))
        .route("/roles", get(list_roles::<U, R>))
        .route("/roles", post(create_role::<U, R>))
        .route("/roles/{id}", delete(delete_role::<U, R>))
        .route("/roles/{id}/users", get(role_users::<U, R>))
        .route("/roles/{id}/users", post(edit_role_users::<U, R>))
}
