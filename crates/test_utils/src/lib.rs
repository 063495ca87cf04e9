//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! achados-core test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for items, claims, and users
//! - `builders`: Builder patterns for test data construction and the
//!   engine harness over the in-memory store
//! - `database`: PostgreSQL testcontainer helpers for integration tests
//! - `assertions`: Recording notifier and event/state assertion helpers
//! - `generators`: Property-based test data generators

pub mod assertions;
pub mod builders;
pub mod database;
pub mod fixtures;
pub mod generators;

pub use assertions::*;
pub use builders::*;
pub use database::*;
pub use fixtures::*;
pub use generators::*;
