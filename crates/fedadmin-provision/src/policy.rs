//! Provisioning policy.
//!
//! Replaces the ambient host-environment lookup of the original flow:
//! the caller decides the policy and passes it in explicitly.

use serde::{Deserialize, Serialize};

/// Policy knobs for the provisioning workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningPolicy {
    /// Enable newly created accounts immediately.
    ///
    /// Intended for local development only: in every other environment a
    /// new account stays disabled until an administrator enables it.
    pub auto_enable_new_users: bool,

    /// Still establish the session when a returning user's last-login
    /// refresh fails.
    ///
    /// The refresh is best effort; with this set (the default) a failed
    /// refresh is logged and the login proceeds. When cleared, the
    /// failure stops the workflow instead.
    pub sign_in_on_refresh_failure: bool,
}

impl Default for ProvisioningPolicy {
    fn default() -> Self {
        Self {
            auto_enable_new_users: false,
            sign_in_on_refresh_failure: true,
        }
    }
}

impl ProvisioningPolicy {
    /// Production policy: new accounts disabled, best-effort refresh.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Local-development policy: new accounts enabled immediately.
    #[must_use]
    pub fn development() -> Self {
        Self {
            auto_enable_new_users: true,
            ..Self::default()
        }
    }
}
