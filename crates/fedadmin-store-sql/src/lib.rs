//! # fedadmin-store-sql
//!
//! PostgreSQL implementation of the identity store traits using `SQLx`.
//!
//! Claims, login linkages, and role memberships live in plain relational
//! tables next to the user and role rows; the schema is owned by the
//! embedded [`MIGRATOR`].

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

mod convert;
mod entities;
mod error;
pub mod pool;
pub mod role;
pub mod user;

pub use pool::{create_pool, PoolConfig, MIGRATOR};
pub use role::PgRoleStore;
pub use user::PgUserStore;
