//! # fedadmin-store
//!
//! Identity store abstraction for the fedadmin identity portal.
//!
//! This crate defines the store traits the workflows depend on and an
//! in-memory implementation used by tests and the development server.
//!
//! ## Store Traits
//!
//! - [`UserStore`] - users, claims, login linkages, and role membership
//! - [`RoleStore`] - role CRUD and enumeration
//!
//! The workflows hold no persistent state of their own; every invocation
//! is stateless over the store, and the store provides its own
//! per-call consistency (concurrent writers race last-write-wins).

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod memory;
pub mod role;
pub mod user;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use role::RoleStore;
pub use user::UserStore;
