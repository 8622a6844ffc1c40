//! Application state.

use std::sync::Arc;

use fedadmin_admin::AdminState;
use fedadmin_provision::Provisioner;
use fedadmin_session::SessionGateway;
use fedadmin_store::{RoleStore, UserStore};

use crate::config::ServerConfig;

/// State shared by every handler.
pub struct AppState<U, R, G>
where
    U: UserStore,
    R: RoleStore,
    G: SessionGateway,
{
    /// Server configuration.
    pub config: ServerConfig,
    /// State for the nested admin router.
    pub admin: AdminState<U, R>,
    /// The login-path workflow.
    pub provisioner: Arc<Provisioner<U, G>>,
    /// The sign-in subsystem.
    pub sessions: Arc<G>,
}

// Manual Clone implementation that doesn't require U/R/G: Clone.
impl<U, R, G> Clone for AppState<U, R, G>
where
    U: UserStore,
    R: RoleStore,
    G: SessionGateway,
{
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            admin: self.admin.clone(),
            provisioner: Arc::clone(&self.provisioner),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<U, R, G> AppState<U, R, G>
where
    U: UserStore,
    R: RoleStore,
    G: SessionGateway,
{
    /// Wires the state for the given stores and session gateway.
    pub fn new(config: ServerConfig, users: Arc<U>, roles: Arc<R>, sessions: Arc<G>) -> Self {
        let provisioner = Arc::new(Provisioner::new(
            Arc::clone(&users),
            Arc::clone(&sessions),
            config.provider.clone(),
            config.provisioning_policy(),
        ));

        Self {
            config,
            admin: AdminState::new(users, roles),
            provisioner,
            sessions,
        }
    }
}
