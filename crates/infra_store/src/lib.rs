//! Storage Adapters
//!
//! This crate provides the two implementations of the lifecycle engine's
//! [`TransitionStore`](domain_lifecycle::TransitionStore) port:
//!
//! - [`MemoryStore`]: in-process tables behind an async `RwLock`, used by
//!   the test suites and by deployments that run without a database.
//! - [`PgStore`]: PostgreSQL via SQLx with one transaction per commit, a
//!   version-guarded item update, and FK cascades for claims and reports.
//!
//! Both adapters enforce the same semantics: a commit applies the whole
//! write-set or nothing, and a stale item version is a `Conflict`.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{create_pool, PgStore};
