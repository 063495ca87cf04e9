//! Lifecycle Engine Ports
//!
//! The engine drives exactly two outbound interfaces: a transactional
//! store combining the item and claim read ports with an atomic commit,
//! and a fire-and-forget change notifier.

use async_trait::async_trait;

use core_kernel::{ClaimId, CoreError, ItemId};
use domain_claims::{Claim, ClaimLedger};
use domain_item::{Item, ItemStore};

use crate::events::ChangeEvent;

/// Item part of a write-set
#[derive(Debug, Clone)]
pub enum ItemWrite {
    /// Insert a freshly created item
    Insert(Item),
    /// Replace the stored item, guarded by the version read at load time
    Update { item: Item, expected_version: u32 },
    /// Remove the item and everything attached to it
    Delete(ItemId),
}

/// Claim part of a write-set
#[derive(Debug, Clone)]
pub enum ClaimWrite {
    Insert(Claim),
    Update(Claim),
    Delete(ClaimId),
}

/// Atomic write-set produced by one engine operation
///
/// Adapters apply the whole set or nothing. A partially applied set would
/// let the stored claim count drift from the ledger.
#[derive(Debug, Clone, Default)]
pub struct TransitionWrite {
    pub item: Option<ItemWrite>,
    pub claims: Vec<ClaimWrite>,
}

impl TransitionWrite {
    /// True when the set carries no writes at all
    pub fn is_empty(&self) -> bool {
        self.item.is_none() && self.claims.is_empty()
    }
}

/// Combined storage port the engine drives
///
/// Supertrait of the two read ports plus the atomic commit.
#[async_trait]
pub trait TransitionStore: ItemStore + ClaimLedger {
    /// Applies a write-set atomically
    ///
    /// # Errors
    ///
    /// Returns `Conflict` when a version guard or uniqueness rule fails;
    /// nothing is applied in that case.
    async fn commit(&self, write: TransitionWrite) -> Result<(), CoreError>;

    /// Cheap liveness probe for readiness checks
    async fn ping(&self) -> Result<(), CoreError>;
}

/// Outbound notification port
///
/// Publication must be fire-and-forget: absent subscribers or a slow
/// consumer never affect the committed operation.
pub trait ChangeNotifier: Send + Sync {
    /// Publishes one event to the currently connected subscribers
    fn publish(&self, event: ChangeEvent);
}

/// A notifier that drops everything, for contexts without subscribers
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl ChangeNotifier for NullNotifier {
    fn publish(&self, _event: ChangeEvent) {}
}
