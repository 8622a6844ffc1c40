//! Session gateway trait and in-memory implementation.

use async_trait::async_trait;
use fedadmin_model::{User, UserClaim};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{SessionError, SessionResult};
use crate::session::{AuthProperties, UserSession};

/// The concurrent sign-in subsystem.
///
/// `sign_in` carries the user's stored claims plus any `extra_claims`
/// the caller accumulated during login (e.g. the provider session index
/// needed for single logout).
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Establishes a session for the user.
    async fn sign_in(
        &self,
        user: &User,
        properties: &AuthProperties,
        extra_claims: &[UserClaim],
    ) -> SessionResult<UserSession>;

    /// Terminates a session.
    ///
    /// ## Errors
    ///
    /// Returns `SessionError::NotFound` if the session doesn't exist.
    async fn sign_out(&self, session_id: Uuid) -> SessionResult<()>;

    /// Finds the active session established for the given provider
    /// session index, if any. Used by single logout.
    async fn find_by_session_index(
        &self,
        provider: &str,
        session_index: &str,
    ) -> SessionResult<Option<UserSession>>;
}

/// In-memory session gateway for tests and the development server.
#[derive(Default)]
pub struct MemorySessions {
    sessions: RwLock<Vec<UserSession>>,
}

impl MemorySessions {
    /// Creates an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions ever established.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Gets a session by id.
    #[must_use]
    pub fn get(&self, session_id: Uuid) -> Option<UserSession> {
        self.sessions
            .read()
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
    }
}

#[async_trait]
impl SessionGateway for MemorySessions {
    async fn sign_in(
        &self,
        user: &User,
        properties: &AuthProperties,
        extra_claims: &[UserClaim],
    ) -> SessionResult<UserSession> {
        let mut session = UserSession::new(user.id, &user.username, &properties.provider);
        for claim in &user.claims {
            session.add_claim(claim.clone());
        }
        for claim in extra_claims {
            session.add_claim(claim.clone());
        }

        self.sessions.write().push(session.clone());
        Ok(session)
    }

    async fn sign_out(&self, session_id: Uuid) -> SessionResult<()> {
        let mut sessions = self.sessions.write();

        let session = sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or(SessionError::NotFound(session_id))?;

        session.sign_out();
        Ok(())
    }

    async fn find_by_session_index(
        &self,
        provider: &str,
        session_index: &str,
    ) -> SessionResult<Option<UserSession>> {
        Ok(self
            .sessions
            .read()
            .iter()
            .find(|s| {
                s.is_active()
                    && s.provider == provider
                    && s.session_index() == Some(session_index)
            })
            .cloned())
    }
}
