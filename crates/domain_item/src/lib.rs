//! Item Domain
//!
//! This crate implements the published-item side of the marketplace: the
//! lifecycle state machine, moderation reports, and the storage port.
//!
//! # Item Lifecycle
//!
//! ```text
//! lost:  perdido    -> pendiente_recuperacion -> recuperado
//! found: encontrado -> pendiente_entrega      -> entregado
//! ```
//!
//! The branch is fixed when the item is created; pending states are derived
//! from the claim ledger.

pub mod error;
pub mod item;
pub mod ports;
pub mod report;
pub mod status;

pub use error::ItemError;
pub use item::{ContactInfo, Coordinates, Item, ItemParts, ItemPatch, NewItem};
pub use ports::{ItemFilter, ItemStore};
pub use report::{Report, ReportReason};
pub use status::{ItemKind, ItemStatus};
