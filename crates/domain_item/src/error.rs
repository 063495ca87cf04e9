//! Item domain errors

use core_kernel::CoreError;
use thiserror::Error;

/// Errors that can occur in the item domain
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Item requires at least one image")]
    NoImages,

    #[error("Item is already resolved")]
    AlreadyResolved,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Active claim count would underflow")]
    CountUnderflow,

    #[error("Unknown item kind: {0}")]
    UnknownKind(String),

    #[error("Unknown item status: {0}")]
    UnknownStatus(String),

    #[error("Unknown report reason: {0}")]
    UnknownReportReason(String),
}

impl From<ItemError> for CoreError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::MissingField(_)
            | ItemError::NoImages
            | ItemError::UnknownKind(_)
            | ItemError::UnknownStatus(_)
            | ItemError::UnknownReportReason(_) => CoreError::validation(err.to_string()),
            ItemError::AlreadyResolved | ItemError::InvalidStatusTransition { .. } => {
                CoreError::conflict(err.to_string())
            }
            ItemError::CountUnderflow => CoreError::invariant(err.to_string()),
        }
    }
}
