//! SQL error mapping.

use fedadmin_store::StoreError;
use sqlx::Error as SqlxError;

/// Converts a `SQLx` error to a store error.
///
/// Unique and reference violations surface as internal errors here; the
/// providers pre-check the cases where a structured `Duplicate` or
/// `NotFound` is part of the contract.
#[allow(clippy::needless_pass_by_value)]
pub fn from_sqlx_error(err: SqlxError) -> StoreError {
    match err {
        SqlxError::RowNotFound => StoreError::Internal("row not found".to_string()),
        SqlxError::Database(db_err) => {
            if db_err.code().is_some_and(|c| c == "23505") {
                StoreError::Internal(format!("duplicate entry: {}", db_err.message()))
            } else if db_err.code().is_some_and(|c| c == "23503") {
                StoreError::Internal(format!("reference violation: {}", db_err.message()))
            } else {
                StoreError::Query(db_err.to_string())
            }
        }
        SqlxError::PoolTimedOut => StoreError::Connection("connection pool timeout".to_string()),
        SqlxError::PoolClosed => StoreError::Connection("connection pool closed".to_string()),
        _ => StoreError::Internal(err.to_string()),
    }
}
