//! Core error types used across the system
//!
//! Every domain and adapter crate surfaces failures through [`CoreError`].
//! The first five variants form the domain taxonomy callers can act on;
//! `Timeout` and `Storage` cover the operational failures of the adapters.

use std::time::Duration;
use thiserror::Error;

/// Core error type shared by every crate in the workspace
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input failed a structural or content rule
    #[error("Validation error: {0}")]
    Validation(String),

    /// Caller is authenticated but not allowed to perform the action
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Referenced entity does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Action is valid in general but not against the current state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A maintained invariant no longer holds; the operation was aborted
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A bounded write did not complete in time
    #[error("operation '{operation}' timed out after {elapsed:?}")]
    Timeout {
        operation: &'static str,
        elapsed: Duration,
    },

    /// The storage adapter failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        CoreError::Authorization(message.into())
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        CoreError::Conflict(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        CoreError::InvariantViolation(message.into())
    }

    pub fn timeout(operation: &'static str, elapsed: Duration) -> Self {
        CoreError::Timeout { operation, elapsed }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        CoreError::Storage(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, CoreError::Authorization(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, CoreError::Conflict(_))
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, CoreError::InvariantViolation(_))
    }
}
