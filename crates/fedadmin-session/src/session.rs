//! Session and sign-in property models.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use fedadmin_model::{claim_types, UserClaim};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// State of a local session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// Session is active.
    #[default]
    Active,
    /// Session has been signed out.
    SignedOut,
}

/// Properties supplied by the authentication handshake and passed through
/// to sign-in unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthProperties {
    /// Identity provider scheme that authenticated the user.
    pub provider: String,
    /// Local URL to return to after sign-in, if any.
    pub return_url: Option<String>,
    /// Additional handshake items (opaque to the workflows).
    pub items: HashMap<String, String>,
}

impl AuthProperties {
    /// Creates properties for the given provider scheme.
    #[must_use]
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            return_url: None,
            items: HashMap::new(),
        }
    }

    /// Sets the return URL.
    #[must_use]
    pub fn with_return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = Some(url.into());
        self
    }

    /// Sets a handshake item.
    #[must_use]
    pub fn with_item(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.insert(key.into(), value.into());
        self
    }
}

/// An established local session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    /// Unique session identifier.
    pub id: Uuid,
    /// User who owns this session.
    pub user_id: Uuid,
    /// Username at establishment time.
    pub username: String,
    /// Identity provider scheme that authenticated the user.
    pub provider: String,
    /// Current state of the session.
    pub state: SessionState,
    /// When the session was established.
    pub established_at: DateTime<Utc>,
    /// Claims carried by the session (the user's claims plus any extra
    /// sign-in claims, e.g. the provider session index).
    pub claims: Vec<UserClaim>,
}

impl UserSession {
    /// Creates a new active session.
    #[must_use]
    pub fn new(user_id: Uuid, username: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            username: username.into(),
            provider: provider.into(),
            state: SessionState::Active,
            established_at: Utc::now(),
            claims: Vec::new(),
        }
    }

    /// Adds a claim to the session.
    pub fn add_claim(&mut self, claim: UserClaim) {
        self.claims.push(claim);
    }

    /// Gets the first claim of the given type, if any.
    #[must_use]
    pub fn find_claim(&self, claim_type: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
    }

    /// The identity-provider session index, if the sign-in attached one.
    #[must_use]
    pub fn session_index(&self) -> Option<&str> {
        self.find_claim(claim_types::SESSION_INDEX)
            .filter(|v| !v.is_empty())
    }

    /// Checks if the session is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active)
    }

    /// Marks the session as signed out.
    pub fn sign_out(&mut self) {
        self.state = SessionState::SignedOut;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_active() {
        let session = UserSession::new(Uuid::now_v7(), "alice", "saml2");

        assert!(session.is_active());
        assert_eq!(session.username, "alice");
        assert!(session.session_index().is_none());
    }

    #[test]
    fn session_index_comes_from_claims() {
        let mut session = UserSession::new(Uuid::now_v7(), "alice", "saml2");
        session.add_claim(UserClaim::new(claim_types::SESSION_INDEX, "sid-42"));

        assert_eq!(session.session_index(), Some("sid-42"));
    }

    #[test]
    fn empty_session_index_reads_as_absent() {
        let mut session = UserSession::new(Uuid::now_v7(), "alice", "saml2");
        session.add_claim(UserClaim::new(claim_types::SESSION_INDEX, ""));

        assert!(session.session_index().is_none());
    }

    #[test]
    fn sign_out_deactivates() {
        let mut session = UserSession::new(Uuid::now_v7(), "alice", "saml2");

        session.sign_out();

        assert!(!session.is_active());
        assert_eq!(session.state, SessionState::SignedOut);
    }

    #[test]
    fn auth_properties_builder() {
        let props = AuthProperties::new("saml2")
            .with_return_url("/admin")
            .with_item("LoginProvider", "saml2");

        assert_eq!(props.provider, "saml2");
        assert_eq!(props.return_url.as_deref(), Some("/admin"));
        assert_eq!(props.items.get("LoginProvider").map(String::as_str), Some("saml2"));
    }
}
