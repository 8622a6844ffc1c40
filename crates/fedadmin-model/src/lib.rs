//! # fedadmin-model
//!
//! Domain models for the fedadmin identity portal.
//!
//! The portal mirrors federated identities into a local store: every
//! [`User`] is created from a SAML assertion on first login and carries
//! the claims and external-login linkage that came with it. [`Role`]s are
//! plain named groups managed by administrators; membership lives in the
//! identity store, not on these types.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod role;
pub mod user;

pub use role::Role;
pub use user::claim_types;
pub use user::{ExternalLogin, User, UserClaim};
