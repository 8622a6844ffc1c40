//! Claim extraction from authenticated assertions.
//!
//! The SAML envelope itself is handled upstream; what reaches this crate
//! is the validated claim set of an authenticated principal.

use std::collections::HashMap;

use fedadmin_model::{claim_types, UserClaim};
use serde::{Deserialize, Serialize};

/// The claim set of an authenticated federation assertion.
///
/// A flat multi-map of claim type to values, as produced by the
/// authentication handshake after signature validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Claim values by claim type.
    pub values: HashMap<String, Vec<String>>,
}

impl AssertionClaims {
    /// Creates an empty claim set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a claim value.
    #[must_use]
    pub fn with_claim(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.values
            .entry(claim_type.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Gets the first value of a claim type, if any.
    #[must_use]
    pub fn first(&self, claim_type: &str) -> Option<&str> {
        self.values
            .get(claim_type)
            .and_then(|v| v.first())
            .map(String::as_str)
    }
}

/// Flat profile extracted from an assertion.
///
/// Extraction never fails: a claim the assertion omitted becomes the
/// empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsProfile {
    /// Stable external identifier (NameID), used as the local username.
    pub external_id: String,
    /// Email address.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Identity-provider session index, kept for single logout.
    pub session_index: String,
}

impl ClaimsProfile {
    /// Extracts the profile from an assertion's claim set.
    #[must_use]
    pub fn extract(assertion: &AssertionClaims) -> Self {
        let first = |claim_type: &str| assertion.first(claim_type).unwrap_or_default().to_string();

        Self {
            external_id: first(claim_types::NAME_ID),
            email: first(claim_types::EMAIL),
            first_name: first(claim_types::GIVEN_NAME),
            last_name: first(claim_types::SURNAME),
            session_index: first(claim_types::SESSION_INDEX),
        }
    }

    /// The three profile claims attached to a newly provisioned user.
    #[must_use]
    pub fn profile_claims(&self) -> Vec<UserClaim> {
        vec![
            UserClaim::new(claim_types::GIVEN_NAME, &self.first_name),
            UserClaim::new(claim_types::SURNAME, &self.last_name),
            UserClaim::new(claim_types::EMAIL, &self.email),
        ]
    }

    /// The session-index claim attached locally at sign-in time.
    #[must_use]
    pub fn session_claim(&self) -> UserClaim {
        UserClaim::new(claim_types::SESSION_INDEX, &self.session_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_assertion() -> AssertionClaims {
        AssertionClaims::new()
            .with_claim(claim_types::NAME_ID, "ext-1234")
            .with_claim(claim_types::GIVEN_NAME, "Alice")
            .with_claim(claim_types::SURNAME, "Smith")
            .with_claim(claim_types::EMAIL, "alice@example.com")
            .with_claim(claim_types::SESSION_INDEX, "sid-42")
    }

    #[test]
    fn extract_reads_all_profile_claims() {
        let profile = ClaimsProfile::extract(&full_assertion());

        assert_eq!(profile.external_id, "ext-1234");
        assert_eq!(profile.first_name, "Alice");
        assert_eq!(profile.last_name, "Smith");
        assert_eq!(profile.email, "alice@example.com");
        assert_eq!(profile.session_index, "sid-42");
    }

    #[test]
    fn absent_claims_become_empty_strings() {
        let assertion = AssertionClaims::new().with_claim(claim_types::NAME_ID, "ext-1234");

        let profile = ClaimsProfile::extract(&assertion);

        assert_eq!(profile.external_id, "ext-1234");
        assert_eq!(profile.email, "");
        assert_eq!(profile.first_name, "");
        assert_eq!(profile.last_name, "");
        assert_eq!(profile.session_index, "");
    }

    #[test]
    fn extract_of_empty_assertion_is_all_empty() {
        let profile = ClaimsProfile::extract(&AssertionClaims::new());

        assert_eq!(profile.external_id, "");
        assert_eq!(profile.session_index, "");
    }

    #[test]
    fn multi_valued_claims_use_first_value() {
        let assertion = AssertionClaims::new()
            .with_claim(claim_types::EMAIL, "alice@example.com")
            .with_claim(claim_types::EMAIL, "alice@other.example");

        let profile = ClaimsProfile::extract(&assertion);
        assert_eq!(profile.email, "alice@example.com");
    }

    #[test]
    fn profile_claims_are_exactly_three() {
        let profile = ClaimsProfile::extract(&full_assertion());
        let claims = profile.profile_claims();

        assert_eq!(claims.len(), 3);
        assert!(claims.iter().any(|c| c.claim_type == claim_types::GIVEN_NAME));
        assert!(claims.iter().any(|c| c.claim_type == claim_types::SURNAME));
        assert!(claims.iter().any(|c| c.claim_type == claim_types::EMAIL));
    }
}
