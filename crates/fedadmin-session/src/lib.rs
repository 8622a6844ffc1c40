//! # fedadmin-session
//!
//! Session establishment boundary for the fedadmin identity portal.
//!
//! The provisioning workflow finishes a successful login by handing the
//! user and its accumulated local claims to a [`SessionGateway`]. The
//! gateway owns the concurrent sign-in subsystem; the workflows only
//! call it, they never inspect or mutate sessions themselves.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod gateway;
pub mod session;

pub use error::{SessionError, SessionResult};
pub use gateway::{MemorySessions, SessionGateway};
pub use session::{AuthProperties, SessionState, UserSession};
