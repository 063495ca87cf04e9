//! Claims domain errors

use core_kernel::CoreError;
use thiserror::Error;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim message must not be empty")]
    EmptyMessage,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Unknown claim status: {0}")]
    UnknownStatus(String),
}

impl From<ClaimError> for CoreError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::EmptyMessage | ClaimError::UnknownStatus(_) => {
                CoreError::validation(err.to_string())
            }
            ClaimError::InvalidStatusTransition { .. } => CoreError::conflict(err.to_string()),
        }
    }
}
