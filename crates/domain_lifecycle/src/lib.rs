//! Lifecycle Engine
//!
//! This crate orchestrates every item and claim mutation in the system.
//! The [`LifecycleEngine`] is the only writer: it serializes mutations per
//! item, applies the transition on the domain aggregates, commits the
//! resulting write-set atomically through the [`TransitionStore`] port, and
//! publishes [`ChangeEvent`]s through the [`ChangeNotifier`] port once the
//! commit succeeded.
//!
//! # Write path
//!
//! ```text
//! per-item lock -> load (item, claims) -> transition on the aggregates
//!   -> atomic commit of the write-set -> publish change events
//! ```

pub mod engine;
pub mod events;
pub mod locks;
pub mod ports;

pub use engine::{ClaimDecision, EngineConfig, ItemDetail, ItemUpdate, LifecycleEngine, UserStats};
pub use events::{ChangeEvent, ClaimChange};
pub use locks::ItemLocks;
pub use ports::{
    ChangeNotifier, ClaimWrite, ItemWrite, NullNotifier, TransitionStore, TransitionWrite,
};
