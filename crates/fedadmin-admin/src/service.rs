//! The administrator workflows.
//!
//! One typed method per workflow; every command takes the acting
//! administrator explicitly and validates its input before touching the
//! store.

use std::sync::Arc;

use fedadmin_model::{Role, User};
use fedadmin_store::{RoleStore, UserStore};
use uuid::Uuid;

use crate::actor::Actor;
use crate::commands::{title_case, CreateRole, DeleteRole, SyncRoleMembers, SyncUserRoles};
use crate::error::{AdminError, AdminResult};
use crate::queries::{RoleMembership, UserDetails, UserMembership};
use crate::report::{SyncAction, SyncReport};
use crate::validate::Validate;

/// Administrator workflows over the identity store.
pub struct AdminService<U, R> {
    users: Arc<U>,
    roles: Arc<R>,
}

impl<U, R> Clone for AdminService<U, R> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            roles: Arc::clone(&self.roles),
        }
    }
}

impl<U, R> AdminService<U, R>
where
    U: UserStore,
    R: RoleStore,
{
    /// Creates the service over the given stores.
    pub fn new(users: Arc<U>, roles: Arc<R>) -> Self {
        Self { users, roles }
    }

    // === Commands ===

    /// Creates a role. The name is title-cased.
    ///
    /// ## Errors
    ///
    /// Validation failure for a blank name, conflict when a role with the
    /// same name exists, or a store error.
    pub async fn create_role(&self, actor: &Actor, command: CreateRole) -> AdminResult<Role> {
        command.validate().map_err(AdminError::Validation)?;

        let name = title_case(command.name.trim());
        if self.roles.get_by_name(&name).await?.is_some() {
            return Err(AdminError::conflict("Role", "name", name));
        }

        let role = Role::new(&name);
        self.roles.create(&role).await.map_err(|e| {
            if e.is_duplicate() {
                AdminError::conflict("Role", "name", &name)
            } else {
                AdminError::from(e)
            }
        })?;

        tracing::info!(actor = %actor, role = %role.name, "role created");
        Ok(role)
    }

    /// Deletes a role and its memberships.
    ///
    /// ## Errors
    ///
    /// Not-found when the role doesn't exist, or a store error.
    pub async fn delete_role(&self, actor: &Actor, command: DeleteRole) -> AdminResult<Role> {
        command.validate().map_err(AdminError::Validation)?;

        let role = self
            .roles
            .get_by_id(command.id)
            .await?
            .ok_or_else(|| AdminError::not_found_id("Role", command.id))?;

        self.roles.delete(role.id).await?;

        tracing::info!(actor = %actor, role = %role.name, "role deleted");
        Ok(role)
    }

    /// Applies membership deltas to a role: adds first, then removes.
    ///
    /// Unknown user ids are skipped; a store failure on one item is
    /// logged and recorded without aborting the batch.
    ///
    /// ## Errors
    ///
    /// Validation failure, not-found when the role doesn't resolve, or a
    /// store error during user lookup.
    pub async fn sync_role_members(
        &self,
        actor: &Actor,
        command: SyncRoleMembers,
    ) -> AdminResult<SyncReport> {
        command.validate().map_err(AdminError::Validation)?;

        let role = self
            .roles
            .get_by_id(command.role_id)
            .await?
            .ok_or_else(|| AdminError::not_found_id("Role", command.role_id))?;

        let mut report = SyncReport::new();

        for user_id in &command.add_user_ids {
            match self.users.get_by_id(*user_id).await? {
                Some(user) => match self.users.add_to_role(user.id, &role.name).await {
                    Ok(()) => report.record_applied(SyncAction::Grant, user_id.to_string()),
                    Err(error) => {
                        tracing::error!(
                            action = "adding users to roles",
                            actor = %actor,
                            %error,
                            "user administration error"
                        );
                        report.record_failure(
                            SyncAction::Grant,
                            user_id.to_string(),
                            error.to_string(),
                        );
                    }
                },
                None => report.record_skipped(SyncAction::Grant, user_id.to_string()),
            }
        }

        for user_id in &command.remove_user_ids {
            match self.users.get_by_id(*user_id).await? {
                Some(user) => match self.users.remove_from_role(user.id, &role.name).await {
                    Ok(()) => report.record_applied(SyncAction::Revoke, user_id.to_string()),
                    Err(error) => {
                        tracing::error!(
                            action = "removing users from roles",
                            actor = %actor,
                            %error,
                            "user administration error"
                        );
                        report.record_failure(
                            SyncAction::Revoke,
                            user_id.to_string(),
                            error.to_string(),
                        );
                    }
                },
                None => report.record_skipped(SyncAction::Revoke, user_id.to_string()),
            }
        }

        Ok(report)
    }

    /// Applies role deltas to a user, toggling the enabled flag first
    /// when the requested value differs from the stored one.
    ///
    /// Unknown role ids are skipped; a store failure on one item is
    /// logged and recorded without aborting the batch.
    ///
    /// ## Errors
    ///
    /// Validation failure, not-found when the user doesn't resolve, or a
    /// store error during role lookup.
    pub async fn sync_user_roles(
        &self,
        actor: &Actor,
        command: SyncUserRoles,
    ) -> AdminResult<SyncReport> {
        command.validate().map_err(AdminError::Validation)?;

        let mut user = self
            .users
            .get_by_id(command.user_id)
            .await?
            .ok_or_else(|| AdminError::not_found_id("User", command.user_id))?;

        let mut report = SyncReport::new();

        if user.enabled != command.enabled {
            user.enabled = command.enabled;
            match self.users.update(&user).await {
                Ok(()) => report.record_applied(SyncAction::SetEnabled, user.id.to_string()),
                Err(error) => {
                    tracing::error!(
                        action = "enabling user",
                        actor = %actor,
                        %error,
                        "user administration error"
                    );
                    report.record_failure(
                        SyncAction::SetEnabled,
                        user.id.to_string(),
                        error.to_string(),
                    );
                }
            }
        }

        for role_id in &command.add_role_ids {
            match self.roles.get_by_id(*role_id).await? {
                Some(role) => match self.users.add_to_role(user.id, &role.name).await {
                    Ok(()) => report.record_applied(SyncAction::Grant, role.name.clone()),
                    Err(error) => {
                        tracing::error!(
                            action = "updating a user membership",
                            actor = %actor,
                            %error,
                            "user administration error"
                        );
                        report.record_failure(SyncAction::Grant, role.name.clone(), error.to_string());
                    }
                },
                None => report.record_skipped(SyncAction::Grant, role_id.to_string()),
            }
        }

        for role_id in &command.remove_role_ids {
            match self.roles.get_by_id(*role_id).await? {
                Some(role) => match self.users.remove_from_role(user.id, &role.name).await {
                    Ok(()) => report.record_applied(SyncAction::Revoke, role.name.clone()),
                    Err(error) => {
                        tracing::error!(
                            action = "deleting user membership",
                            actor = %actor,
                            %error,
                            "user administration error"
                        );
                        report.record_failure(
                            SyncAction::Revoke,
                            role.name.clone(),
                            error.to_string(),
                        );
                    }
                },
                None => report.record_skipped(SyncAction::Revoke, role_id.to_string()),
            }
        }

        Ok(report)
    }

    // === Queries ===

    /// Lists every user in the store's native order.
    ///
    /// ## Errors
    ///
    /// Returns a store error when enumeration fails.
    pub async fn list_users(&self) -> AdminResult<Vec<User>> {
        Ok(self.users.list().await?)
    }

    /// Lists every role in the store's native order.
    ///
    /// ## Errors
    ///
    /// Returns a store error when enumeration fails.
    pub async fn list_roles(&self) -> AdminResult<Vec<Role>> {
        Ok(self.roles.list().await?)
    }

    /// Partitions every known user by membership in the given role.
    ///
    /// Returns `Ok(None)` when the role doesn't resolve.
    ///
    /// ## Errors
    ///
    /// Returns a store error when a lookup fails.
    pub async fn role_members(&self, role_id: Uuid) -> AdminResult<Option<RoleMembership>> {
        let Some(role) = self.roles.get_by_id(role_id).await? else {
            return Ok(None);
        };

        let mut members = Vec::new();
        let mut non_members = Vec::new();
        for user in self.users.list().await? {
            if self.users.is_in_role(user.id, &role.name).await? {
                members.push(user);
            } else {
                non_members.push(user);
            }
        }

        Ok(Some(RoleMembership {
            role,
            members,
            non_members,
        }))
    }

    /// Partitions every known role by the given user's membership.
    ///
    /// Returns `Ok(None)` when the user doesn't resolve.
    ///
    /// ## Errors
    ///
    /// Returns a store error when a lookup fails.
    pub async fn user_roles(&self, user_id: Uuid) -> AdminResult<Option<UserMembership>> {
        let Some(user) = self.users.get_by_id(user_id).await? else {
            return Ok(None);
        };

        let mut member_roles = Vec::new();
        let mut non_member_roles = Vec::new();
        for role in self.roles.list().await? {
            if self.users.is_in_role(user.id, &role.name).await? {
                member_roles.push(role);
            } else {
                non_member_roles.push(role);
            }
        }

        Ok(Some(UserMembership {
            user,
            member_roles,
            non_member_roles,
        }))
    }

    /// Fetches a user's detail view.
    ///
    /// Returns `Ok(None)` when the user doesn't resolve.
    ///
    /// ## Errors
    ///
    /// Returns a store error when a lookup fails.
    pub async fn user_details(&self, user_id: Uuid) -> AdminResult<Option<UserDetails>> {
        let Some(user) = self.users.get_by_id(user_id).await? else {
            return Ok(None);
        };

        let member_roles = self.users.roles_of(user.id).await?;

        Ok(Some(UserDetails { user, member_roles }))
    }
}
