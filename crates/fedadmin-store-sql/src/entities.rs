//! Database entity types for `SQLx`.
//!
//! These types map directly to database rows and are converted to and
//! from domain models in [`crate::convert`].

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for users.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub enabled: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for user claims.
#[derive(Debug, Clone, FromRow)]
pub struct UserClaimRow {
    pub claim_type: String,
    pub claim_value: String,
}

/// Database row for external-login linkages.
#[derive(Debug, Clone, FromRow)]
pub struct ExternalLoginRow {
    pub provider: String,
    pub subject: String,
}

/// Database row for roles.
#[derive(Debug, Clone, FromRow)]
pub struct RoleRow {
    pub id: Uuid,
    pub name: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
