//! # fedadmin-admin
//!
//! Administrator workflows for the fedadmin identity portal: role CRUD,
//! role-membership synchronization, and the read-only projections behind
//! the user/role screens, plus the REST surface that exposes them.
//!
//! Each workflow is a plain typed method on [`AdminService`] taking an
//! explicit [`Actor`]; request types carry their own preconditions via
//! [`Validate`], which runs before any store access.
//!
//! ## Modules
//!
//! - [`actor`] - explicit caller identity
//! - [`validate`] - precondition checks on command inputs
//! - [`report`] - per-item outcomes of batch membership sync
//! - [`commands`] - command request types
//! - [`queries`] - read-only projection types
//! - [`service`] - the workflows themselves
//! - [`dto`] - JSON representations for the REST surface
//! - [`error`] - error types and HTTP mapping
//! - [`router`] - axum router and handlers
//! - [`state`] - shared state for the handlers

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod actor;
pub mod commands;
pub mod dto;
pub mod error;
pub mod queries;
pub mod report;
pub mod router;
pub mod service;
pub mod state;
pub mod validate;

pub use actor::Actor;
pub use commands::{CreateRole, DeleteRole, SyncRoleMembers, SyncUserRoles};
pub use error::{AdminError, AdminResult};
pub use queries::{RoleMembership, UserDetails, UserMembership};
pub use report::{SyncAction, SyncOutcome, SyncReport, SyncStatus};
pub use router::admin_router;
pub use service::AdminService;
pub use state::AdminState;
pub use validate::{Validate, ValidationErrors, ValidationFailure};
