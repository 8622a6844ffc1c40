//! User domain model.
//!
//! Users are local principals mirroring a federated identity. They are
//! created exactly once, at the first successful federated login for a
//! given external identifier, and keep the claims and provider linkage
//! that arrived with the assertion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A claim attached to a user (type/value pair).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaim {
    /// Claim type, usually a URI from the identity assertion.
    pub claim_type: String,
    /// Claim value. May be empty when the assertion omitted the claim.
    pub value: String,
}

impl UserClaim {
    /// Creates a new claim.
    #[must_use]
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// An external-login linkage (identity provider + subject key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLogin {
    /// Identity provider scheme (e.g. "saml2").
    pub provider: String,
    /// Subject key of the user at the provider.
    pub subject: String,
}

impl ExternalLogin {
    /// Creates a new linkage.
    #[must_use]
    pub fn new(provider: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            subject: subject.into(),
        }
    }
}

/// A local user provisioned from a federated identity.
///
/// The `username` is the stable external identifier supplied by the
/// identity provider and is immutable after creation. A provisioned user
/// always carries at least one external-login linkage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// External identifier used as the local username. Immutable.
    pub username: String,
    /// Email address from the assertion, if present.
    pub email: Option<String>,
    /// First name from the assertion, if present.
    pub first_name: Option<String>,
    /// Last name from the assertion, if present.
    pub last_name: Option<String>,
    /// Whether the account may sign in. Defaults to `false`; flipped only
    /// by an administrator or the development-only provisioning override.
    pub enabled: bool,
    /// Most recent login, if the user has ever logged in.
    pub last_login: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Claims attached to the user.
    pub claims: Vec<UserClaim>,
    /// External-login linkages.
    pub logins: Vec<ExternalLogin>,
}

impl User {
    /// Creates a new disabled user with the given external identifier.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            username: username.into(),
            email: None,
            first_name: None,
            last_name: None,
            enabled: false,
            last_login: None,
            created_at: now,
            updated_at: now,
            claims: Vec::new(),
            logins: Vec::new(),
        }
    }

    /// Sets the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the first name.
    #[must_use]
    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn with_last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    /// Sets whether the user is enabled.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the last-login timestamp.
    #[must_use]
    pub const fn with_last_login(mut self, at: DateTime<Utc>) -> Self {
        self.last_login = Some(at);
        self
    }

    /// Gets the user's full name.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }

    /// Records a login at the given instant.
    pub fn touch_login(&mut self, at: DateTime<Utc>) {
        self.last_login = Some(at);
        self.updated_at = at;
    }

    /// Adds a claim. Re-adding an identical claim is a no-op.
    pub fn add_claim(&mut self, claim: UserClaim) {
        if !self.claims.contains(&claim) {
            self.claims.push(claim);
        }
    }

    /// Checks whether the user carries the given claim.
    #[must_use]
    pub fn has_claim(&self, claim_type: &str, value: &str) -> bool {
        self.claims
            .iter()
            .any(|c| c.claim_type == claim_type && c.value == value)
    }

    /// Gets the first claim of the given type, if any.
    #[must_use]
    pub fn find_claim(&self, claim_type: &str) -> Option<&UserClaim> {
        self.claims.iter().find(|c| c.claim_type == claim_type)
    }

    /// Adds an external-login linkage. Re-adding is a no-op.
    pub fn add_login(&mut self, login: ExternalLogin) {
        if !self.logins.contains(&login) {
            self.logins.push(login);
        }
    }

    /// Checks whether the user is linked to the given provider subject.
    #[must_use]
    pub fn has_login(&self, provider: &str, subject: &str) -> bool {
        self.logins
            .iter()
            .any(|l| l.provider == provider && l.subject == subject)
    }
}

/// Well-known claim types carried by federation assertions.
///
/// The identity-claim URIs match what the upstream SAML identity provider
/// emits; the session index is the provider's session key, kept as a
/// local claim so single logout can address the remote session.
pub mod claim_types {
    /// Stable subject identifier (NameID).
    pub const NAME_ID: &str =
        "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";
    /// Given (first) name.
    pub const GIVEN_NAME: &str =
        "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/givenname";
    /// Surname (last name).
    pub const SURNAME: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/surname";
    /// Email address.
    pub const EMAIL: &str =
        "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress";
    /// Identity-provider session index, needed for single logout.
    pub const SESSION_INDEX: &str = "http://saml2/sid";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_is_disabled_with_no_linkage() {
        let user = User::new("ext-1234");

        assert_eq!(user.username, "ext-1234");
        assert!(!user.enabled);
        assert!(user.last_login.is_none());
        assert!(user.claims.is_empty());
        assert!(user.logins.is_empty());
    }

    #[test]
    fn builder_pattern_works() {
        let user = User::new("ext-1234")
            .with_email("alice@example.com")
            .with_first_name("Alice")
            .with_last_name("Smith")
            .with_enabled(true);

        assert_eq!(user.email, Some("alice@example.com".to_string()));
        assert_eq!(user.full_name(), Some("Alice Smith".to_string()));
        assert!(user.enabled);
    }

    #[test]
    fn full_name_handles_partial() {
        let first_only = User::new("u1").with_first_name("Alice");
        assert_eq!(first_only.full_name(), Some("Alice".to_string()));

        let last_only = User::new("u2").with_last_name("Smith");
        assert_eq!(last_only.full_name(), Some("Smith".to_string()));

        assert_eq!(User::new("u3").full_name(), None);
    }

    #[test]
    fn claims_are_idempotent() {
        let mut user = User::new("ext-1234");

        user.add_claim(UserClaim::new(claim_types::EMAIL, "alice@example.com"));
        user.add_claim(UserClaim::new(claim_types::EMAIL, "alice@example.com"));

        assert_eq!(user.claims.len(), 1);
        assert!(user.has_claim(claim_types::EMAIL, "alice@example.com"));
        assert!(!user.has_claim(claim_types::EMAIL, "other@example.com"));
    }

    #[test]
    fn logins_are_idempotent() {
        let mut user = User::new("ext-1234");

        user.add_login(ExternalLogin::new("saml2", "ext-1234"));
        user.add_login(ExternalLogin::new("saml2", "ext-1234"));

        assert_eq!(user.logins.len(), 1);
        assert!(user.has_login("saml2", "ext-1234"));
        assert!(!user.has_login("oidc", "ext-1234"));
    }

    #[test]
    fn touch_login_advances_timestamps() {
        let mut user = User::new("ext-1234");
        let now = Utc::now();

        user.touch_login(now);

        assert_eq!(user.last_login, Some(now));
        assert_eq!(user.updated_at, now);
    }
}
