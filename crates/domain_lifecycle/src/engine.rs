//! Lifecycle Engine
//!
//! The single entry point for every state change in the system. Each
//! mutation follows the same write path:
//!
//! ```text
//! per-item lock -> load (item, claims) -> transition on the aggregates
//!   -> atomic commit of the write-set -> publish change events
//! ```
//!
//! The per-item lock serializes writers of one item without coupling
//! unrelated items; the commit applies item and claim changes in one
//! critical section; events go out after the commit succeeded and before
//! the per-item lock is released, so subscribers observe one item's
//! events in commit order. The whole cycle runs under a bounded timeout.
//! A timed-out caller may retry: the uniqueness checks run again against
//! whatever state actually committed.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{error, info, warn};

use core_kernel::{ClaimId, CoreError, ItemId, UserId};
use domain_claims::{ledger, Claim};
use domain_item::{
    Item, ItemFilter, ItemKind, ItemPatch, ItemStatus, NewItem, Report, ReportReason,
};

use crate::events::{ChangeEvent, ClaimChange};
use crate::locks::ItemLocks;
use crate::ports::{ChangeNotifier, ClaimWrite, ItemWrite, TransitionStore, TransitionWrite};

/// Engine tuning knobs
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound for one lock-load-transition-commit cycle
    pub write_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            write_timeout: Duration::from_secs(5),
        }
    }
}

/// Publisher's decision on a pending claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimDecision {
    #[serde(rename = "aprobada")]
    Approve,
    #[serde(rename = "rechazada")]
    Reject,
}

/// Item detail read model: the item plus its ledger-derived views
#[derive(Debug, Clone)]
pub struct ItemDetail {
    pub item: Item,
    /// Full ledger, oldest first
    pub claims: Vec<Claim>,
    /// Claimant of the most recent approved claim, if any
    pub claimer: Option<UserId>,
}

/// Requested changes for an item
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub fields: ItemPatch,
    /// Requested status; resolved against the claim-derived state
    pub status: Option<ItemStatus>,
}

/// Per-user activity counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    /// Items the user published
    pub published: u32,
    /// Items on which the user is the current claimer
    pub claimed: u32,
    /// Published items that reached a terminal state
    pub delivered: u32,
}

/// Orchestrates every item and claim mutation
///
/// The engine owns no state besides the lock registry; all durable state
/// lives behind the [`TransitionStore`] port and all outbound
/// notifications behind [`ChangeNotifier`].
pub struct LifecycleEngine {
    store: Arc<dyn TransitionStore>,
    notifier: Arc<dyn ChangeNotifier>,
    locks: ItemLocks,
    config: EngineConfig,
}

impl LifecycleEngine {
    /// Creates an engine with default configuration
    pub fn new(store: Arc<dyn TransitionStore>, notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self::with_config(store, notifier, EngineConfig::default())
    }

    /// Creates an engine with explicit configuration
    pub fn with_config(
        store: Arc<dyn TransitionStore>,
        notifier: Arc<dyn ChangeNotifier>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            locks: ItemLocks::new(),
            config,
        }
    }

    // ========================================================================
    // Item operations
    // ========================================================================

    /// Publishes a new item on the base state of its branch
    ///
    /// # Errors
    ///
    /// Returns `Validation` when a required field is missing or blank, or
    /// when no image reference was supplied.
    pub async fn create_item(
        &self,
        publisher: UserId,
        input: NewItem,
        kind: ItemKind,
    ) -> Result<Item, CoreError> {
        let item = self
            .bounded("create_item", async {
                let item = Item::new(publisher, input, kind)?;
                // Hold the lock through publish so a writer that spots the
                // freshly committed row cannot emit its event first
                let _guard = self.locks.acquire(item.id()).await;
                self.store
                    .commit(TransitionWrite {
                        item: Some(ItemWrite::Insert(item.clone())),
                        claims: Vec::new(),
                    })
                    .await?;
                self.notifier.publish(ChangeEvent::ItemCreated { item: item.clone() });
                Ok(item)
            })
            .await?;

        info!(item_id = %item.id(), kind = %kind, "item published");
        Ok(item)
    }

    /// Loads one item with its claims and the derived claimer
    pub async fn get_item(&self, id: ItemId) -> Result<ItemDetail, CoreError> {
        let item = self.load_item(id).await?;
        let claims = self.store.list_claims(id).await?;
        let claimer = ledger::current_claimer(&claims).cloned();
        Ok(ItemDetail {
            item,
            claims,
            claimer,
        })
    }

    /// Lists items matching the filter, newest first
    pub async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>, CoreError> {
        self.store.list_items(filter).await
    }

    /// Updates item fields and, optionally, its status
    ///
    /// Only the publisher may update. Text fields change freely; the
    /// status is claim-derived, so a requested status is only honored
    /// when it equals the current one (no-op) or the branch terminal
    /// (resolution). Every other request is a conflict.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown item, `Authorization` for non-publishers,
    /// `Validation` for blank patched fields, `Conflict` for status
    /// requests that contradict the ledger.
    pub async fn update_item_fields(
        &self,
        id: ItemId,
        caller: &UserId,
        update: ItemUpdate,
    ) -> Result<Item, CoreError> {
        let item = self
            .bounded("update_item_fields", async {
                let _guard = self.locks.acquire(id).await;

                let mut item = self.load_item(id).await?;
                if !item.is_published_by(caller) {
                    return Err(CoreError::authorization(
                        "only the publisher can update an item",
                    ));
                }

                let expected_version = item.version();
                let mut claims = self.store.list_claims(id).await?;
                let mut claim_writes = Vec::new();
                let mut events = Vec::new();

                let mut changed = item.apply_patch(update.fields)?;

                if let Some(target) = update.status {
                    if target != item.status() {
                        if target != item.kind().terminal() {
                            return Err(CoreError::conflict(format!(
                                "status '{}' cannot be set directly; it is derived from the claims",
                                target
                            )));
                        }
                        self.resolve_item(&mut item, &mut claims, &mut claim_writes, &mut events)?;
                        changed = true;
                    }
                }

                if !changed {
                    return Ok(item);
                }

                self.verify_count(&item, ledger::active_count(&claims))?;
                self.store
                    .commit(TransitionWrite {
                        item: Some(ItemWrite::Update {
                            item: item.clone(),
                            expected_version,
                        }),
                        claims: claim_writes,
                    })
                    .await?;

                events.push(ChangeEvent::ItemUpdated { item: item.clone() });
                self.publish_all(events);
                Ok(item)
            })
            .await?;

        Ok(item)
    }

    /// Removes an item and everything attached to it
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown item, `Authorization` for non-publishers.
    pub async fn delete_item(&self, id: ItemId, caller: &UserId) -> Result<(), CoreError> {
        self.bounded("delete_item", async {
            let _guard = self.locks.acquire(id).await;

            let item = self.load_item(id).await?;
            if !item.is_published_by(caller) {
                return Err(CoreError::authorization(
                    "only the publisher can delete an item",
                ));
            }

            self.store
                .commit(TransitionWrite {
                    item: Some(ItemWrite::Delete(id)),
                    claims: Vec::new(),
                })
                .await?;

            self.notifier.publish(ChangeEvent::ItemDeleted { item_id: id });
            Ok(())
        })
        .await?;

        info!(item_id = %id, "item deleted");
        Ok(())
    }

    /// Marks an item delivered/recovered
    ///
    /// Moves the item to its branch terminal state, sets the resolved
    /// flag, and implicitly rejects every claim still pending. Approved
    /// claims keep their status; the claimer view stays derivable.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown item, `Authorization` for non-publishers,
    /// `Conflict` when the item is already resolved.
    pub async fn set_resolved(&self, id: ItemId, caller: &UserId) -> Result<Item, CoreError> {
        let item = self
            .bounded("set_resolved", async {
                let _guard = self.locks.acquire(id).await;

                let mut item = self.load_item(id).await?;
                if !item.is_published_by(caller) {
                    return Err(CoreError::authorization(
                        "only the publisher can resolve an item",
                    ));
                }

                let expected_version = item.version();
                let mut claims = self.store.list_claims(id).await?;
                let mut claim_writes = Vec::new();
                let mut events = Vec::new();

                self.resolve_item(&mut item, &mut claims, &mut claim_writes, &mut events)?;
                self.verify_count(&item, ledger::active_count(&claims))?;

                self.store
                    .commit(TransitionWrite {
                        item: Some(ItemWrite::Update {
                            item: item.clone(),
                            expected_version,
                        }),
                        claims: claim_writes,
                    })
                    .await?;

                events.push(ChangeEvent::ItemUpdated { item: item.clone() });
                self.publish_all(events);
                Ok(item)
            })
            .await?;

        info!(item_id = %id, status = %item.status(), "item resolved");
        Ok(item)
    }

    // ========================================================================
    // Claim operations
    // ========================================================================

    /// Files a claim on an item
    ///
    /// The first active claim moves the item to its pending state; every
    /// active claim raises `claims_count` by one.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown item, `Authorization` when the claimant
    /// published the item, `Conflict` when the item is resolved or the
    /// claimant already has an active claim on it, `Validation` for a
    /// blank message.
    pub async fn create_claim(
        &self,
        item_id: ItemId,
        claimant: UserId,
        message: String,
    ) -> Result<Claim, CoreError> {
        let claim = self
            .bounded("create_claim", async {
                let _guard = self.locks.acquire(item_id).await;

                let mut item = self.load_item(item_id).await?;
                if item.is_published_by(&claimant) {
                    return Err(CoreError::authorization(
                        "publishers cannot claim their own items",
                    ));
                }
                if item.is_resolved() {
                    return Err(CoreError::conflict("item is already resolved"));
                }

                let claims = self.store.list_claims(item_id).await?;
                if ledger::has_active_claim_by(&claims, &claimant) {
                    return Err(CoreError::conflict(
                        "claimant already has an active claim on this item",
                    ));
                }

                let expected_version = item.version();
                let claim = Claim::new(item_id, claimant, message)?;
                item.register_claim()?;
                self.verify_count(&item, ledger::active_count(&claims) + 1)?;

                self.store
                    .commit(TransitionWrite {
                        item: Some(ItemWrite::Update {
                            item: item.clone(),
                            expected_version,
                        }),
                        claims: vec![ClaimWrite::Insert(claim.clone())],
                    })
                    .await?;

                self.notifier.publish(ChangeEvent::ClaimCreated {
                    item_id,
                    claim: claim.clone(),
                });
                self.notifier.publish(ChangeEvent::ItemUpdated { item });
                Ok(claim)
            })
            .await?;

        info!(item_id = %item_id, claim_id = %claim.id, "claim filed");
        Ok(claim)
    }

    /// Loads one claim; readable by its claimant and the item's publisher
    pub async fn get_claim(&self, id: ClaimId, caller: &UserId) -> Result<Claim, CoreError> {
        let claim = self.load_claim(id).await?;
        let item = self.load_item(claim.item_id).await?;
        if &claim.claimant != caller && !item.is_published_by(caller) {
            return Err(CoreError::authorization(
                "claims are visible to the claimant and the publisher only",
            ));
        }
        Ok(claim)
    }

    /// Lists an item's claims
    ///
    /// The publisher sees the whole ledger; any other caller sees only
    /// their own claims.
    pub async fn list_claims(
        &self,
        item_id: ItemId,
        caller: &UserId,
    ) -> Result<Vec<Claim>, CoreError> {
        let item = self.load_item(item_id).await?;
        let mut claims = self.store.list_claims(item_id).await?;
        if !item.is_published_by(caller) {
            claims.retain(|claim| &claim.claimant == caller);
        }
        Ok(claims)
    }

    /// Applies the publisher's decision to a pending claim
    ///
    /// Approval marks the claimant as the designated claimer and changes
    /// nothing else; only resolution moves the item to its terminal
    /// state. Rejection releases the claim's hold on the item, reverting
    /// it to the branch base when no active claims remain.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown claim, `Authorization` when the caller
    /// did not publish the item, `Conflict` when the item is resolved or
    /// the claim is no longer pending.
    pub async fn update_claim_status(
        &self,
        claim_id: ClaimId,
        caller: &UserId,
        decision: ClaimDecision,
    ) -> Result<Claim, CoreError> {
        // Resolve the owning item outside the lock, then reload under it
        let item_id = self.load_claim(claim_id).await?.item_id;

        let claim = self
            .bounded("update_claim_status", async {
                let _guard = self.locks.acquire(item_id).await;

                let mut claim = self.load_claim(claim_id).await?;
                let mut item = self.load_item(claim.item_id).await?;
                if !item.is_published_by(caller) {
                    return Err(CoreError::authorization(
                        "only the publisher decides claims",
                    ));
                }
                if item.is_resolved() {
                    return Err(CoreError::conflict("item is already resolved"));
                }

                let claims = self.store.list_claims(item.id()).await?;
                let active_before = ledger::active_count(&claims);
                let expected_version = item.version();

                let item_event = match decision {
                    ClaimDecision::Approve => {
                        claim.approve()?;
                        // Approval keeps the claim active; the item is untouched
                        self.store
                            .commit(TransitionWrite {
                                item: None,
                                claims: vec![ClaimWrite::Update(claim.clone())],
                            })
                            .await?;
                        None
                    }
                    ClaimDecision::Reject => {
                        claim.reject()?;
                        item.release_claim()?;
                        self.verify_count(&item, active_before - 1)?;
                        self.store
                            .commit(TransitionWrite {
                                item: Some(ItemWrite::Update {
                                    item: item.clone(),
                                    expected_version,
                                }),
                                claims: vec![ClaimWrite::Update(claim.clone())],
                            })
                            .await?;
                        Some(ChangeEvent::ItemUpdated { item })
                    }
                };

                let change = match decision {
                    ClaimDecision::Approve => ClaimChange::Approved,
                    ClaimDecision::Reject => ClaimChange::Rejected,
                };
                self.notifier.publish(ChangeEvent::ClaimUpdated {
                    item_id,
                    claim_id,
                    change,
                });
                if let Some(event) = item_event {
                    self.notifier.publish(event);
                }
                Ok(claim)
            })
            .await?;

        info!(claim_id = %claim_id, ?decision, "claim decided");
        Ok(claim)
    }

    /// Withdraws a claim
    ///
    /// Removes the claim from the ledger. When it was active, the item's
    /// count drops and the status reverts to the branch base if nothing
    /// active remains.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown claim, `Authorization` when the caller is
    /// not the claimant, `Conflict` when the item is already resolved (the
    /// ledger freezes at resolution).
    pub async fn delete_claim(&self, claim_id: ClaimId, caller: &UserId) -> Result<(), CoreError> {
        let item_id = self.load_claim(claim_id).await?.item_id;

        self.bounded("delete_claim", async {
            let _guard = self.locks.acquire(item_id).await;

            let claim = self.load_claim(claim_id).await?;
            if &claim.claimant != caller {
                return Err(CoreError::authorization(
                    "only the claimant can withdraw a claim",
                ));
            }
            let mut item = self.load_item(claim.item_id).await?;
            if item.is_resolved() {
                return Err(CoreError::conflict(
                    "claims cannot be withdrawn after resolution",
                ));
            }

            let claims = self.store.list_claims(item.id()).await?;
            let active_before = ledger::active_count(&claims);
            let expected_version = item.version();

            let item_write = if claim.status.is_active() {
                item.release_claim()?;
                self.verify_count(&item, active_before - 1)?;
                Some(ItemWrite::Update {
                    item: item.clone(),
                    expected_version,
                })
            } else {
                None
            };
            let item_changed = item_write.is_some();

            self.store
                .commit(TransitionWrite {
                    item: item_write,
                    claims: vec![ClaimWrite::Delete(claim_id)],
                })
                .await?;

            self.notifier.publish(ChangeEvent::ClaimUpdated {
                item_id,
                claim_id,
                change: ClaimChange::Withdrawn,
            });
            if item_changed {
                self.notifier.publish(ChangeEvent::ItemUpdated { item });
            }
            Ok(())
        })
        .await?;

        info!(claim_id = %claim_id, "claim withdrawn");
        Ok(())
    }

    // ========================================================================
    // Reports and statistics
    // ========================================================================

    /// Files a moderation report against an item
    ///
    /// Reports never touch the lifecycle and are not broadcast.
    pub async fn add_report(
        &self,
        item_id: ItemId,
        reporter: UserId,
        reason: ReportReason,
        description: Option<String>,
    ) -> Result<Report, CoreError> {
        // Existence check up front for a precise NotFound
        self.load_item(item_id).await?;

        let report = Report::new(item_id, reporter, reason, description);
        self.store.add_report(&report).await?;
        info!(item_id = %item_id, reason = %report.reason, "item reported");
        Ok(report)
    }

    /// Lists an item's reports; visible to the publisher only
    pub async fn list_reports(
        &self,
        item_id: ItemId,
        caller: &UserId,
    ) -> Result<Vec<Report>, CoreError> {
        let item = self.load_item(item_id).await?;
        if !item.is_published_by(caller) {
            return Err(CoreError::authorization(
                "reports are visible to the publisher only",
            ));
        }
        self.store.list_reports(item_id).await
    }

    /// Computes a user's activity counters
    pub async fn user_stats(&self, user: &UserId) -> Result<UserStats, CoreError> {
        let published_items = self
            .store
            .list_items(&ItemFilter::by_publisher(user.clone()))
            .await?;
        let published = published_items.len() as u32;
        let delivered = published_items
            .iter()
            .filter(|item| item.status().is_terminal())
            .count() as u32;

        // "claimed" counts items on which this user is the current claimer,
        // so each approved claim is checked against the item's full ledger.
        let mut claimed = 0;
        let own_claims = self.store.list_claims_by_claimant(user).await?;
        for claim in own_claims
            .iter()
            .filter(|claim| claim.status == domain_claims::ClaimStatus::Approved)
        {
            let item_claims = self.store.list_claims(claim.item_id).await?;
            if ledger::current_claimer(&item_claims) == Some(user) {
                claimed += 1;
            }
        }

        Ok(UserStats {
            published,
            claimed,
            delivered,
        })
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Applies resolution to a loaded item and its ledger
    ///
    /// Rejects every pending claim, releases its hold on the count, and
    /// moves the item to its terminal state. Mutates `claims` in place so
    /// the caller's invariant recheck sees the post-resolution ledger.
    fn resolve_item(
        &self,
        item: &mut Item,
        claims: &mut [Claim],
        claim_writes: &mut Vec<ClaimWrite>,
        events: &mut Vec<ChangeEvent>,
    ) -> Result<(), CoreError> {
        item.resolve()?;

        for claim in claims
            .iter_mut()
            .filter(|claim| claim.status == domain_claims::ClaimStatus::Pending)
        {
            claim.reject()?;
            item.release_claim()?;
            claim_writes.push(ClaimWrite::Update(claim.clone()));
            events.push(ChangeEvent::ClaimUpdated {
                item_id: item.id(),
                claim_id: claim.id,
                change: ClaimChange::Rejected,
            });
        }
        Ok(())
    }

    async fn load_item(&self, id: ItemId) -> Result<Item, CoreError> {
        self.store
            .get_item(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Item", id.to_string()))
    }

    async fn load_claim(&self, id: ClaimId) -> Result<Claim, CoreError> {
        self.store
            .get_claim(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Claim", id.to_string()))
    }

    /// Aborts the operation when the stored count and the ledger disagree
    fn verify_count(&self, item: &Item, derived: u32) -> Result<(), CoreError> {
        if item.claims_count() != derived {
            error!(
                item_id = %item.id(),
                stored = item.claims_count(),
                derived,
                "claim count diverged from the ledger"
            );
            return Err(CoreError::invariant(format!(
                "item {} carries claim count {} but the ledger derives {}",
                item.id(),
                item.claims_count(),
                derived
            )));
        }
        Ok(())
    }

    fn publish_all(&self, events: Vec<ChangeEvent>) {
        for event in events {
            self.notifier.publish(event);
        }
    }

    /// Runs a write cycle under the configured timeout
    async fn bounded<T>(
        &self,
        operation: &'static str,
        work: impl std::future::Future<Output = Result<T, CoreError>>,
    ) -> Result<T, CoreError> {
        match timeout(self.config.write_timeout, work).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, timeout_ms = self.config.write_timeout.as_millis() as u64, "write timed out");
                Err(CoreError::timeout(operation, self.config.write_timeout))
            }
        }
    }
}
