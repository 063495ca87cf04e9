//! Claim Domain Ports
//!
//! Read-side port for the claim ledger. Mutations go through the lifecycle
//! engine's transactional commit, never through this trait.

use async_trait::async_trait;

use core_kernel::{ClaimId, CoreError, ItemId, UserId};

use crate::claim::Claim;

/// Read-side storage port for claims
#[async_trait]
pub trait ClaimLedger: Send + Sync {
    /// Loads a single claim
    ///
    /// # Returns
    ///
    /// `None` when no claim has this id.
    async fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, CoreError>;

    /// Lists every claim for an item, oldest first
    async fn list_claims(&self, item_id: ItemId) -> Result<Vec<Claim>, CoreError>;

    /// Lists a user's claims across all items, newest first
    async fn list_claims_by_claimant(&self, claimant: &UserId) -> Result<Vec<Claim>, CoreError>;
}
