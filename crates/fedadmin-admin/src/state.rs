//! Shared state for the admin handlers.

use std::sync::Arc;

use fedadmin_store::{RoleStore, UserStore};

use crate::service::AdminService;

/// State handed to the admin router.
///
/// Holds the store providers behind `Arc` for thread-safe shared
/// ownership.
pub struct AdminState<U, R>
where
    U: UserStore,
    R: RoleStore,
{
    /// User store provider.
    pub users: Arc<U>,
    /// Role store provider.
    pub roles: Arc<R>,
}

// Manual Clone implementation that doesn't require U/R: Clone.
impl<U, R> Clone for AdminState<U, R>
where
    U: UserStore,
    R: RoleStore,
{
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            roles: Arc::clone(&self.roles),
        }
    }
}

impl<U, R> AdminState<U, R>
where
    U: UserStore,
    R: RoleStore,
{
    /// Creates state over the given stores.
    pub fn new(users: Arc<U>, roles: Arc<R>) -> Self {
        Self { users, roles }
    }

    /// The workflow service over these stores.
    #[must_use]
    pub fn service(&self) -> AdminService<U, R> {
        AdminService::new(Arc::clone(&self.users), Arc::clone(&self.roles))
    }
}
