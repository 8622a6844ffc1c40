//! The auto-provisioning workflow.
//!
//! One linear sequence of awaited store calls per login; no state is
//! kept between invocations.

use std::sync::Arc;

use chrono::Utc;
use fedadmin_model::{ExternalLogin, User};
use fedadmin_session::{AuthProperties, SessionGateway, UserSession};
use fedadmin_store::UserStore;
use serde::{Deserialize, Serialize};

use crate::claims::{AssertionClaims, ClaimsProfile};
use crate::error::ProvisionResult;
use crate::policy::ProvisioningPolicy;

/// How the login was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Disposition {
    /// A new local account was created for the external identity.
    Created,
    /// An existing account was found and its last login refreshed.
    Refreshed,
}

/// Outcome of a provisioning run.
///
/// Store and session failures surface as errors instead; this type only
/// describes runs that completed. `authorized == false` is the
/// authenticated-but-not-enabled case: the account exists but may not
/// proceed, and no session was established.
#[derive(Debug, Clone)]
pub struct ProvisionOutcome {
    /// The user after provisioning.
    pub user: User,
    /// How the login was handled.
    pub disposition: Disposition,
    /// Whether the account is authorized to proceed.
    pub authorized: bool,
    /// The established session, when authorized.
    pub session: Option<UserSession>,
}

impl ProvisionOutcome {
    /// Whether the login may proceed (the boolean contract of the
    /// original flow).
    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        self.authorized
    }

    /// Whether a session was established.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }
}

/// The auto-provisioning workflow over an identity store and a session
/// gateway.
pub struct Provisioner<S, G> {
    store: Arc<S>,
    sessions: Arc<G>,
    provider: String,
    policy: ProvisioningPolicy,
}

impl<S, G> Provisioner<S, G>
where
    S: UserStore,
    G: SessionGateway,
{
    /// Creates a provisioner for the given provider scheme.
    pub fn new(
        store: Arc<S>,
        sessions: Arc<G>,
        provider: impl Into<String>,
        policy: ProvisioningPolicy,
    ) -> Self {
        Self {
            store,
            sessions,
            provider: provider.into(),
            policy,
        }
    }

    /// The policy this provisioner runs under.
    #[must_use]
    pub const fn policy(&self) -> &ProvisioningPolicy {
        &self.policy
    }

    /// Runs the provisioning workflow for an authenticated assertion.
    ///
    /// Looks up the user by external-login linkage. A returning user gets
    /// a best-effort last-login refresh and is signed in. An unseen
    /// external identity gets a new local account with the three profile
    /// claims and a provider linkage; unless the policy auto-enables new
    /// users the run ends unauthorized without a session.
    ///
    /// ## Errors
    ///
    /// Returns an error when the store rejects the creation path, when
    /// session establishment fails, or (under a strict policy) when the
    /// last-login refresh fails. Already-persisted steps are not rolled
    /// back.
    pub async fn provision(
        &self,
        assertion: &AssertionClaims,
        properties: &AuthProperties,
    ) -> ProvisionResult<ProvisionOutcome> {
        let profile = ClaimsProfile::extract(assertion);

        // A blank external id is carried through; the lookup simply
        // misses and the creation path takes over.
        tracing::info!(external_id = %profile.external_id, "starting user lookup");

        let existing = self
            .store
            .get_by_login(&self.provider, &profile.external_id)
            .await?;

        match existing {
            Some(user) => self.refresh_returning_user(user, &profile, properties).await,
            None => self.create_new_user(&profile, properties).await,
        }
    }

    async fn refresh_returning_user(
        &self,
        mut user: User,
        profile: &ClaimsProfile,
        properties: &AuthProperties,
    ) -> ProvisionResult<ProvisionOutcome> {
        let now = Utc::now();
        user.touch_login(now);

        match self.store.update(&user).await {
            Ok(()) => {
                tracing::info!(
                    username = %user.username,
                    last_login = %now,
                    "returning user, last login refreshed"
                );
            }
            Err(error) => {
                // Best effort: the refresh failure does not block the
                // login unless the policy says so.
                tracing::error!(
                    username = %user.username,
                    %error,
                    "failed to refresh last login"
                );
                if !self.policy.sign_in_on_refresh_failure {
                    return Err(error.into());
                }
            }
        }

        self.establish_session(user, Disposition::Refreshed, profile, properties)
            .await
    }

    async fn create_new_user(
        &self,
        profile: &ClaimsProfile,
        properties: &AuthProperties,
    ) -> ProvisionResult<ProvisionOutcome> {
        tracing::info!(
            external_id = %profile.external_id,
            "user not found, provisioning new account"
        );

        let mut user = User::new(&profile.external_id)
            .with_enabled(self.policy.auto_enable_new_users)
            .with_last_login(Utc::now());
        if !profile.email.is_empty() {
            user = user.with_email(&profile.email);
        }
        if !profile.first_name.is_empty() {
            user = user.with_first_name(&profile.first_name);
        }
        if !profile.last_name.is_empty() {
            user = user.with_last_name(&profile.last_name);
        }

        if let Err(error) = self.store.create(&user).await {
            tracing::error!(username = %user.username, %error, "failed to create user");
            return Err(error.into());
        }
        tracing::info!(username = %user.username, "user created");

        tracing::info!(username = %user.username, "attaching profile claims");
        let claims = profile.profile_claims();
        if let Err(error) = self.store.add_claims(user.id, &claims).await {
            tracing::error!(username = %user.username, %error, "failed to attach profile claims");
            return Err(error.into());
        }
        for claim in claims {
            user.add_claim(claim);
        }

        tracing::info!(username = %user.username, "registering external login");
        let login = ExternalLogin::new(&self.provider, &profile.external_id);
        if let Err(error) = self.store.add_login(user.id, &login).await {
            tracing::error!(username = %user.username, %error, "failed to register external login");
            return Err(error.into());
        }
        user.add_login(login);

        if !user.enabled {
            tracing::info!(username = %user.username, "user is not enabled");
            return Ok(ProvisionOutcome {
                user,
                disposition: Disposition::Created,
                authorized: false,
                session: None,
            });
        }

        self.establish_session(user, Disposition::Created, profile, properties)
            .await
    }

    async fn establish_session(
        &self,
        user: User,
        disposition: Disposition,
        profile: &ClaimsProfile,
        properties: &AuthProperties,
    ) -> ProvisionResult<ProvisionOutcome> {
        // The provider session index rides along as a local sign-in
        // claim; single logout needs it next to the NameID.
        tracing::info!(username = %user.username, "attaching session index and signing in");

        let extra_claims = [profile.session_claim()];
        let session = self
            .sessions
            .sign_in(&user, properties, &extra_claims)
            .await?;

        Ok(ProvisionOutcome {
            user,
            disposition,
            authorized: true,
            session: Some(session),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fedadmin_model::claim_types;
    use fedadmin_session::MemorySessions;
    use fedadmin_store::MemoryStore;

    fn assertion(external_id: &str) -> AssertionClaims {
        AssertionClaims::new()
            .with_claim(claim_types::NAME_ID, external_id)
            .with_claim(claim_types::GIVEN_NAME, "Alice")
            .with_claim(claim_types::SURNAME, "Smith")
            .with_claim(claim_types::EMAIL, "alice@example.com")
            .with_claim(claim_types::SESSION_INDEX, "sid-42")
    }

    fn provisioner(policy: ProvisioningPolicy) -> Provisioner<MemoryStore, MemorySessions> {
        Provisioner::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemorySessions::new()),
            "saml2",
            policy,
        )
    }

    #[tokio::test]
    async fn first_login_under_development_policy_signs_in() {
        let provisioner = provisioner(ProvisioningPolicy::development());

        let outcome = provisioner
            .provision(&assertion("ext-1234"), &AuthProperties::new("saml2"))
            .await
            .unwrap();

        assert_eq!(outcome.disposition, Disposition::Created);
        assert!(outcome.is_authorized());
        assert!(outcome.is_signed_in());
        assert!(outcome.user.enabled);

        let session = outcome.session.unwrap();
        assert_eq!(session.session_index(), Some("sid-42"));
    }

    #[tokio::test]
    async fn first_login_under_production_policy_is_unauthorized() {
        let provisioner = provisioner(ProvisioningPolicy::production());

        let outcome = provisioner
            .provision(&assertion("ext-1234"), &AuthProperties::new("saml2"))
            .await
            .unwrap();

        assert_eq!(outcome.disposition, Disposition::Created);
        assert!(!outcome.is_authorized());
        assert!(!outcome.is_signed_in());
        assert!(!outcome.user.enabled);
    }

    #[tokio::test]
    async fn created_user_carries_profile_and_linkage() {
        let store = Arc::new(MemoryStore::new());
        let provisioner = Provisioner::new(
            Arc::clone(&store),
            Arc::new(MemorySessions::new()),
            "saml2",
            ProvisioningPolicy::production(),
        );

        let outcome = provisioner
            .provision(&assertion("ext-1234"), &AuthProperties::new("saml2"))
            .await
            .unwrap();

        let stored = store
            .get_by_login("saml2", "ext-1234")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, outcome.user.id);
        assert_eq!(stored.username, "ext-1234");
        assert_eq!(stored.email.as_deref(), Some("alice@example.com"));
        assert_eq!(stored.claims.len(), 3);
        assert_eq!(stored.logins.len(), 1);
        assert!(stored.last_login.is_some());
    }

    #[tokio::test]
    async fn returning_user_is_refreshed_not_recreated() {
        let store = Arc::new(MemoryStore::new());
        let provisioner = Provisioner::new(
            Arc::clone(&store),
            Arc::new(MemorySessions::new()),
            "saml2",
            ProvisioningPolicy::development(),
        );
        let props = AuthProperties::new("saml2");

        let first = provisioner
            .provision(&assertion("ext-1234"), &props)
            .await
            .unwrap();
        let first_login = first.user.last_login.unwrap();

        let second = provisioner
            .provision(&assertion("ext-1234"), &props)
            .await
            .unwrap();

        assert_eq!(second.disposition, Disposition::Refreshed);
        assert_eq!(second.user.id, first.user.id);
        assert_eq!(store.user_count(), 1);
        assert!(second.user.last_login.unwrap() >= first_login);
    }

    #[tokio::test]
    async fn returning_user_signs_in_even_when_disabled() {
        // The enabled gate applies to first-time creations only.
        let store = Arc::new(MemoryStore::new());
        let provisioner = Provisioner::new(
            Arc::clone(&store),
            Arc::new(MemorySessions::new()),
            "saml2",
            ProvisioningPolicy::production(),
        );
        let props = AuthProperties::new("saml2");

        let first = provisioner
            .provision(&assertion("ext-1234"), &props)
            .await
            .unwrap();
        assert!(!first.is_authorized());

        let second = provisioner
            .provision(&assertion("ext-1234"), &props)
            .await
            .unwrap();
        assert_eq!(second.disposition, Disposition::Refreshed);
        assert!(second.is_signed_in());
    }

    #[tokio::test]
    async fn blank_external_id_still_takes_the_creation_path() {
        let store = Arc::new(MemoryStore::new());
        let provisioner = Provisioner::new(
            Arc::clone(&store),
            Arc::new(MemorySessions::new()),
            "saml2",
            ProvisioningPolicy::production(),
        );

        let outcome = provisioner
            .provision(&AssertionClaims::new(), &AuthProperties::new("saml2"))
            .await
            .unwrap();

        assert_eq!(outcome.disposition, Disposition::Created);
        assert_eq!(outcome.user.username, "");
        assert_eq!(store.user_count(), 1);
    }
}
