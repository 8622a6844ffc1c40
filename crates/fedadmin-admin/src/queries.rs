//! Read-only projections behind the admin screens.

use fedadmin_model::{Role, User};
use serde::{Deserialize, Serialize};

/// A role with every known user partitioned into members and
/// non-members.
///
/// The two lists are disjoint and together cover the full user set, in
/// the store's native enumeration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleMembership {
    /// The role.
    pub role: Role,
    /// Users that are members of the role.
    pub members: Vec<User>,
    /// Users that are not members of the role.
    pub non_members: Vec<User>,
}

/// A user with every known role partitioned into memberships and
/// non-memberships.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMembership {
    /// The user.
    pub user: User,
    /// Roles the user is a member of.
    pub member_roles: Vec<Role>,
    /// Roles the user is not a member of.
    pub non_member_roles: Vec<Role>,
}

/// A user's detail view: the user plus the names of its roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    /// The user.
    pub user: User,
    /// Names of the roles the user is a member of.
    pub member_roles: Vec<String>,
}
