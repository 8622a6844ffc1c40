//! JSON representations for the REST surface.

use chrono::{DateTime, Utc};
use fedadmin_model::{Role, User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::commands::{CreateRole, SyncRoleMembers, SyncUserRoles};
use crate::queries::{RoleMembership, UserDetails, UserMembership};

/// Request to create a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    /// Role name.
    pub name: String,
}

impl From<CreateRoleRequest> for CreateRole {
    fn from(request: CreateRoleRequest) -> Self {
        Self { name: request.name }
    }
}

/// Request to edit a role's members.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUsersEditRequest {
    /// Users to add to the role.
    #[serde(default)]
    pub add_ids: Vec<Uuid>,
    /// Users to remove from the role.
    #[serde(default)]
    pub delete_ids: Vec<Uuid>,
}

impl RoleUsersEditRequest {
    /// Converts this request into the command for the given role.
    #[must_use]
    pub fn into_command(self, role_id: Uuid) -> SyncRoleMembers {
        SyncRoleMembers {
            role_id,
            add_user_ids: self.add_ids,
            remove_user_ids: self.delete_ids,
        }
    }
}

/// Request to edit a user's roles and enabled flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRolesEditRequest {
    /// Requested enabled state.
    #[serde(default)]
    pub is_enabled: bool,
    /// Roles to add the user to.
    #[serde(default)]
    pub add_ids: Vec<Uuid>,
    /// Roles to remove the user from.
    #[serde(default)]
    pub delete_ids: Vec<Uuid>,
}

impl UserRolesEditRequest {
    /// Converts this request into the command for the given user.
    #[must_use]
    pub fn into_command(self, user_id: Uuid) -> SyncUserRoles {
        SyncUserRoles {
            user_id,
            enabled: self.is_enabled,
            add_role_ids: self.add_ids,
            remove_role_ids: self.delete_ids,
        }
    }
}

/// Role representation for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRepresentation {
    /// Unique identifier.
    pub id: Uuid,
    /// Role name.
    pub name: String,
    /// Display name, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
}

impl From<Role> for RoleRepresentation {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            display_name: role.display_name,
            created_at: role.created_at,
        }
    }
}

/// User representation for API responses.
///
/// Claims and login linkages stay internal; the screens only need the
/// profile, the enabled flag, and login recency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRepresentation {
    /// Unique identifier.
    pub id: Uuid,
    /// Username (the external identifier).
    pub username: String,
    /// Email address, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// First name, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Whether the account may sign in.
    pub is_enabled: bool,
    /// Most recent login, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_time: Option<DateTime<Utc>>,
}

impl From<User> for UserRepresentation {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_enabled: user.enabled,
            last_login_time: user.last_login,
        }
    }
}

/// Role membership partition for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUsersRepresentation {
    /// The role.
    pub role: RoleRepresentation,
    /// Members of the role.
    pub members: Vec<UserRepresentation>,
    /// Users outside the role.
    pub non_members: Vec<UserRepresentation>,
}

impl From<RoleMembership> for RoleUsersRepresentation {
    fn from(partition: RoleMembership) -> Self {
        Self {
            role: partition.role.into(),
            members: partition.members.into_iter().map(Into::into).collect(),
            non_members: partition.non_members.into_iter().map(Into::into).collect(),
        }
    }
}

/// User membership partition for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRolesRepresentation {
    /// The user.
    pub user: UserRepresentation,
    /// Roles the user is a member of.
    pub member_roles: Vec<RoleRepresentation>,
    /// Roles the user is not a member of.
    pub non_member_roles: Vec<RoleRepresentation>,
}

impl From<UserMembership> for UserRolesRepresentation {
    fn from(partition: UserMembership) -> Self {
        Self {
            user: partition.user.into(),
            member_roles: partition.member_roles.into_iter().map(Into::into).collect(),
            non_member_roles: partition
                .non_member_roles
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// User detail view for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailsRepresentation {
    /// The user.
    pub user: UserRepresentation,
    /// Names of the roles the user is a member of.
    pub member_roles: Vec<String>,
}

impl From<UserDetails> for UserDetailsRepresentation {
    fn from(details: UserDetails) -> Self {
        Self {
            user: details.user.into(),
            member_roles: details.member_roles,
        }
    }
}
