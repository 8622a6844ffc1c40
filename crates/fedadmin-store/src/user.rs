//! User store trait.

use async_trait::async_trait;
use fedadmin_model::{ExternalLogin, User, UserClaim};
use uuid::Uuid;

use crate::error::StoreResult;

/// Store for users, their claims and login linkages, and role membership.
///
/// Implementations must be thread-safe and support concurrent access.
/// Attach operations (`add_claims`, `add_login`, `add_to_role`) are
/// idempotent: re-applying an attachment that already exists is a no-op,
/// so provisioning steps can be retried without compensation.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates a new user.
    ///
    /// ## Errors
    ///
    /// Returns `StoreError::Duplicate` if a user with the same username
    /// or id already exists.
    async fn create(&self, user: &User) -> StoreResult<()>;

    /// Updates an existing user.
    ///
    /// The username is immutable; implementations never rewrite it.
    ///
    /// ## Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist.
    async fn update(&self, user: &User) -> StoreResult<()>;

    /// Gets a user by id.
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Gets a user by username (the external identifier).
    async fn get_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Gets the user linked to the given provider subject, if any.
    async fn get_by_login(&self, provider: &str, subject: &str) -> StoreResult<Option<User>>;

    /// Lists all users in the store's native enumeration order.
    async fn list(&self) -> StoreResult<Vec<User>>;

    /// Attaches claims to a user. Already-attached claims are skipped.
    ///
    /// ## Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist.
    async fn add_claims(&self, user_id: Uuid, claims: &[UserClaim]) -> StoreResult<()>;

    /// Registers an external-login linkage. Re-registering is a no-op.
    ///
    /// ## Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist, and
    /// `StoreError::Duplicate` if the linkage already belongs to a
    /// different user.
    async fn add_login(&self, user_id: Uuid, login: &ExternalLogin) -> StoreResult<()>;

    /// Adds the user to a role. Adding an existing member is a no-op.
    ///
    /// ## Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist and
    /// `StoreError::NotFoundByName` if the role doesn't exist.
    async fn add_to_role(&self, user_id: Uuid, role_name: &str) -> StoreResult<()>;

    /// Removes the user from a role. Removing a non-member is a no-op.
    ///
    /// ## Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist and
    /// `StoreError::NotFoundByName` if the role doesn't exist.
    async fn remove_from_role(&self, user_id: Uuid, role_name: &str) -> StoreResult<()>;

    /// Checks whether the user is a member of the role.
    async fn is_in_role(&self, user_id: Uuid, role_name: &str) -> StoreResult<bool>;

    /// Gets the names of the roles the user is a member of, in the
    /// store's native enumeration order.
    async fn roles_of(&self, user_id: Uuid) -> StoreResult<Vec<String>>;
}
