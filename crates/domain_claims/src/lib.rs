//! Claims Domain
//!
//! This crate implements the claim side of the marketplace: users assert
//! ownership of (or knowledge about) a published item, the publisher
//! approves or rejects, and the ledger rules derive the item's state.
//!
//! # Claim Lifecycle
//!
//! ```text
//! pendiente -> aprobada
//!           -> rechazada
//! ```
//!
//! A claim deleted by its claimant is withdrawn and leaves the ledger
//! entirely; there is no stored withdrawn state.

pub mod claim;
pub mod error;
pub mod ledger;
pub mod ports;

pub use claim::{Claim, ClaimStatus};
pub use error::ClaimError;
pub use ports::ClaimLedger;
