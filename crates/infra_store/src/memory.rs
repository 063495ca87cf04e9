//! In-memory store
//!
//! Keeps all tables in `BTreeMap`s behind one async `RwLock`, so a commit
//! is a single write-lock scope and readers never observe a half-applied
//! write-set. Deployments without a database run on this adapter; the test
//! suites use it as the reference implementation of the port semantics.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use core_kernel::{ClaimId, CoreError, ItemId, ReportId, UserId};
use domain_claims::{Claim, ClaimLedger};
use domain_item::{Item, ItemFilter, ItemStore, Report};
use domain_lifecycle::{ClaimWrite, ItemWrite, TransitionStore, TransitionWrite};

#[derive(Debug, Default)]
struct Tables {
    items: BTreeMap<ItemId, Item>,
    claims: BTreeMap<ClaimId, Claim>,
    reports: BTreeMap<ReportId, Report>,
}

/// In-process implementation of the transition store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items, exposed for diagnostics and tests
    pub async fn item_count(&self) -> usize {
        self.tables.read().await.items.len()
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, CoreError> {
        Ok(self.tables.read().await.items.get(&id).cloned())
    }

    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>, CoreError> {
        let tables = self.tables.read().await;
        let mut items: Vec<Item> = tables
            .items
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(items)
    }

    async fn add_report(&self, report: &Report) -> Result<(), CoreError> {
        let mut tables = self.tables.write().await;
        if !tables.items.contains_key(&report.item_id) {
            return Err(CoreError::not_found("Item", report.item_id.to_string()));
        }
        tables.reports.insert(report.id, report.clone());
        Ok(())
    }

    async fn list_reports(&self, item_id: ItemId) -> Result<Vec<Report>, CoreError> {
        let tables = self.tables.read().await;
        let mut reports: Vec<Report> = tables
            .reports
            .values()
            .filter(|report| report.item_id == item_id)
            .cloned()
            .collect();
        reports.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(reports)
    }
}

#[async_trait]
impl ClaimLedger for MemoryStore {
    async fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, CoreError> {
        Ok(self.tables.read().await.claims.get(&id).cloned())
    }

    async fn list_claims(&self, item_id: ItemId) -> Result<Vec<Claim>, CoreError> {
        let tables = self.tables.read().await;
        let mut claims: Vec<Claim> = tables
            .claims
            .values()
            .filter(|claim| claim.item_id == item_id)
            .cloned()
            .collect();
        claims.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(claims)
    }

    async fn list_claims_by_claimant(&self, claimant: &UserId) -> Result<Vec<Claim>, CoreError> {
        let tables = self.tables.read().await;
        let mut claims: Vec<Claim> = tables
            .claims
            .values()
            .filter(|claim| &claim.claimant == claimant)
            .cloned()
            .collect();
        claims.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(claims)
    }
}

#[async_trait]
impl TransitionStore for MemoryStore {
    async fn commit(&self, write: TransitionWrite) -> Result<(), CoreError> {
        let mut tables = self.tables.write().await;

        // Validate every guard before touching anything, so a failed
        // write-set leaves the tables untouched.
        match &write.item {
            Some(ItemWrite::Insert(item)) => {
                if tables.items.contains_key(&item.id()) {
                    return Err(CoreError::conflict(format!(
                        "item {} already exists",
                        item.id()
                    )));
                }
            }
            Some(ItemWrite::Update {
                item,
                expected_version,
            }) => {
                let stored = tables
                    .items
                    .get(&item.id())
                    .ok_or_else(|| CoreError::not_found("Item", item.id().to_string()))?;
                if stored.version() != *expected_version {
                    return Err(CoreError::conflict(format!(
                        "item {} changed concurrently (stored version {}, expected {})",
                        item.id(),
                        stored.version(),
                        expected_version
                    )));
                }
            }
            Some(ItemWrite::Delete(id)) => {
                if !tables.items.contains_key(id) {
                    return Err(CoreError::not_found("Item", id.to_string()));
                }
            }
            None => {}
        }

        match write.item {
            Some(ItemWrite::Insert(item)) | Some(ItemWrite::Update { item, .. }) => {
                tables.items.insert(item.id(), item);
            }
            Some(ItemWrite::Delete(id)) => {
                tables.items.remove(&id);
                tables.claims.retain(|_, claim| claim.item_id != id);
                tables.reports.retain(|_, report| report.item_id != id);
            }
            None => {}
        }

        for claim_write in write.claims {
            match claim_write {
                ClaimWrite::Insert(claim) | ClaimWrite::Update(claim) => {
                    tables.claims.insert(claim.id, claim);
                }
                ClaimWrite::Delete(id) => {
                    tables.claims.remove(&id);
                }
            }
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
