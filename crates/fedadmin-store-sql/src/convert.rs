//! Conversions between database rows and domain models.

use fedadmin_model::{ExternalLogin, Role, User, UserClaim};

use crate::entities::{ExternalLoginRow, RoleRow, UserClaimRow, UserRow};

/// Assembles a domain user from its rows.
pub fn user_from_rows(
    row: UserRow,
    claims: Vec<UserClaimRow>,
    logins: Vec<ExternalLoginRow>,
) -> User {
    User {
        id: row.id,
        username: row.username,
        email: row.email,
        first_name: row.first_name,
        last_name: row.last_name,
        enabled: row.enabled,
        last_login: row.last_login,
        created_at: row.created_at,
        updated_at: row.updated_at,
        claims: claims
            .into_iter()
            .map(|c| UserClaim::new(c.claim_type, c.claim_value))
            .collect(),
        logins: logins
            .into_iter()
            .map(|l| ExternalLogin::new(l.provider, l.subject))
            .collect(),
    }
}

/// Converts a role row into the domain model.
pub fn role_from_row(row: RoleRow) -> Role {
    Role {
        id: row.id,
        name: row.name,
        display_name: row.display_name,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}
