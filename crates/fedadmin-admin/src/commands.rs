//! Command request types.
//!
//! Plain data carried into [`crate::service::AdminService`]; each type
//! declares its preconditions via [`Validate`].

use uuid::Uuid;

use crate::validate::{Validate, ValidationErrors};

/// Create a new role.
#[derive(Debug, Clone)]
pub struct CreateRole {
    /// Role name. Title-cased on creation.
    pub name: String,
}

impl Validate for CreateRole {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "The name of the role can't be empty.");
        }
        errors.finish()
    }
}

/// Delete an existing role.
#[derive(Debug, Clone)]
pub struct DeleteRole {
    /// Id of the role to delete.
    pub id: Uuid,
}

impl Validate for DeleteRole {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_non_nil("id", self.id);
        errors.finish()
    }
}

/// Apply membership deltas to one role.
///
/// `add_user_ids` is processed before `remove_user_ids`; an id in both
/// sets ends up removed.
#[derive(Debug, Clone, Default)]
pub struct SyncRoleMembers {
    /// Id of the role to edit.
    pub role_id: Uuid,
    /// Users to add to the role.
    pub add_user_ids: Vec<Uuid>,
    /// Users to remove from the role.
    pub remove_user_ids: Vec<Uuid>,
}

impl Validate for SyncRoleMembers {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_non_nil("roleId", self.role_id);
        errors.finish()
    }
}

/// Apply role deltas to one user, toggling the enabled flag first.
///
/// The flag is only written when the requested value differs from the
/// stored one. `add_role_ids` is processed before `remove_role_ids`.
#[derive(Debug, Clone, Default)]
pub struct SyncUserRoles {
    /// Id of the user to edit.
    pub user_id: Uuid,
    /// Requested enabled state.
    pub enabled: bool,
    /// Roles to add the user to.
    pub add_role_ids: Vec<Uuid>,
    /// Roles to remove the user from.
    pub remove_role_ids: Vec<Uuid>,
}

impl Validate for SyncUserRoles {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_non_nil("userId", self.user_id);
        errors.finish()
    }
}

/// Title-cases a role name: first letter of each word upper-cased, the
/// rest kept as typed.
#[must_use]
pub fn title_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut at_word_start = true;
    for ch in name.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            result.push(ch);
        } else if at_word_start {
            result.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            result.push(ch);
        }
    }
    result
}
