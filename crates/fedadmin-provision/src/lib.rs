//! # fedadmin-provision
//!
//! Federated login auto-provisioning for the fedadmin identity portal.
//!
//! On every federated login the [`Provisioner`] decides whether to create
//! a local account from the assertion's claims, links the external
//! identity, gates first-time activation behind an environment policy,
//! refreshes last-login metadata for returning users, and establishes
//! the local session.
//!
//! The workflow is stateless over the identity store and performs no
//! rollback: persisted steps stay persisted when a later step fails, and
//! every step is idempotent at the store layer instead.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod claims;
pub mod error;
pub mod policy;
pub mod workflow;

pub use claims::{AssertionClaims, ClaimsProfile};
pub use error::{ProvisionError, ProvisionResult};
pub use policy::ProvisioningPolicy;
pub use workflow::{Disposition, ProvisionOutcome, Provisioner};
