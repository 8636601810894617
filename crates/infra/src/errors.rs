//! Classification of document-store failures.
//!
//! Page code treats every store failure as non-fatal: the UI keeps showing
//! what it has and the failure is only logged. The log level depends on how
//! actionable the failure is.

use crate::document_store::{StoreError, StoreErrorCode};

/// Marker the hosted client puts in the message of its internal state-machine
/// failures. These clear up on their own and are noise at higher levels.
pub const INTERNAL_ASSERTION_MARKER: &str = "INTERNAL ASSERTION FAILED";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorClass {
    PermissionDenied,
    TransientAssertion,
    Unavailable,
    Other,
}

pub fn classify(err: &StoreError) -> ErrorClass {
    match err.code {
        StoreErrorCode::PermissionDenied => ErrorClass::PermissionDenied,
        StoreErrorCode::Internal if err.message.contains(INTERNAL_ASSERTION_MARKER) => {
            ErrorClass::TransientAssertion
        }
        StoreErrorCode::Unavailable => ErrorClass::Unavailable,
        _ => ErrorClass::Other,
    }
}

/// Log a failed store call and carry on without its value.
pub fn log_and_continue<T>(operation: &str, result: Result<T, StoreError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            match classify(&err) {
                ErrorClass::TransientAssertion => {
                    tracing::debug!(operation, error = %err, "transient client assertion ignored");
                }
                ErrorClass::PermissionDenied => {
                    tracing::warn!(operation, error = %err, "permission denied by security rules");
                }
                ErrorClass::Unavailable => {
                    tracing::error!(operation, error = %err, "document store unavailable");
                }
                ErrorClass::Other => {
                    tracing::error!(operation, code = %err.code, error = %err, "document store call failed");
                }
            }
            None
        }
    }
}
