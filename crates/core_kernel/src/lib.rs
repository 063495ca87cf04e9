//! Core Kernel - Foundational types for the Achados platform
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Strongly-typed identifiers for items, claims and moderation reports
//! - The opaque user identifier issued by the identity platform
//! - The error taxonomy every boundary in the system speaks

pub mod error;
pub mod identifiers;

pub use error::CoreError;
pub use identifiers::{ClaimId, ItemId, ReportId, UserId};
