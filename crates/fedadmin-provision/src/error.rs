//! Provisioning error types.

use thiserror::Error;

use fedadmin_session::SessionError;
use fedadmin_store::StoreError;

/// Errors that can stop the provisioning workflow.
///
/// Persisted steps preceding the failure remain persisted; there is no
/// compensating transaction.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The identity store rejected an operation.
    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),

    /// The sign-in subsystem rejected session establishment.
    #[error("session establishment failed: {0}")]
    Session(#[from] SessionError),
}

/// Result type for provisioning operations.
pub type ProvisionResult<T> = Result<T, ProvisionError>;
