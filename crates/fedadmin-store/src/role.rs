//! Role store trait.

use async_trait::async_trait;
use fedadmin_model::Role;
use uuid::Uuid;

use crate::error::StoreResult;

/// Store for role CRUD and enumeration.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Creates a new role.
    ///
    /// ## Errors
    ///
    /// Returns `StoreError::Duplicate` if a role with the same name
    /// already exists.
    async fn create(&self, role: &Role) -> StoreResult<()>;

    /// Deletes a role by id, along with all of its memberships.
    ///
    /// ## Errors
    ///
    /// Returns `StoreError::NotFound` if the role doesn't exist.
    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    /// Gets a role by id.
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Role>>;

    /// Gets a role by name.
    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Role>>;

    /// Lists all roles in the store's native enumeration order.
    async fn list(&self) -> StoreResult<Vec<Role>>;
}
