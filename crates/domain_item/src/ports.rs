//! Item Domain Ports
//!
//! This module defines the read-side port for items, enabling swappable
//! storage implementations (in-memory, PostgreSQL, mock).
//!
//! Write operations do not live here: every mutation goes through the
//! lifecycle engine's transactional commit so item and claim changes land
//! atomically.

use async_trait::async_trait;

use core_kernel::{CoreError, ItemId, UserId};

use crate::item::Item;
use crate::report::Report;
use crate::status::{ItemKind, ItemStatus};

/// Query parameters for listing items
///
/// All fields combine with AND; an empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    /// Match any of these statuses; empty matches all
    pub statuses: Vec<ItemStatus>,
    /// Filter by branch
    pub kind: Option<ItemKind>,
    /// Filter by exact category slug
    pub category: Option<String>,
    /// Case-insensitive substring match on the location text
    pub location: Option<String>,
    /// Case-insensitive substring match on title or description
    pub text: Option<String>,
    /// Filter by publishing user
    pub publisher: Option<UserId>,
    /// Filter by the police-deposit flag
    pub police_deposit: Option<bool>,
}

impl ItemFilter {
    /// Creates a filter matching one publisher's items
    pub fn by_publisher(publisher: UserId) -> Self {
        Self {
            publisher: Some(publisher),
            ..Default::default()
        }
    }

    /// Creates a filter matching a set of statuses
    pub fn by_statuses(statuses: Vec<ItemStatus>) -> Self {
        Self {
            statuses,
            ..Default::default()
        }
    }

    /// Checks whether `item` satisfies every criterion
    ///
    /// This is the reference semantics; SQL adapters must match it.
    pub fn matches(&self, item: &Item) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&item.status()) {
            return false;
        }
        if let Some(kind) = self.kind {
            if item.kind() != kind {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            if item.category() != category {
                return false;
            }
        }
        if let Some(ref location) = self.location {
            if !item
                .location()
                .to_lowercase()
                .contains(&location.to_lowercase())
            {
                return false;
            }
        }
        if let Some(ref text) = self.text {
            let needle = text.to_lowercase();
            let in_title = item.title().to_lowercase().contains(&needle);
            let in_description = item.description().to_lowercase().contains(&needle);
            if !in_title && !in_description {
                return false;
            }
        }
        if let Some(ref publisher) = self.publisher {
            if !item.is_published_by(publisher) {
                return false;
            }
        }
        if let Some(police) = self.police_deposit {
            if item.police_deposit() != police {
                return false;
            }
        }
        true
    }
}

/// Read-side storage port for items and their moderation reports
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Loads a single item
    ///
    /// # Returns
    ///
    /// `None` when no item has this id.
    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, CoreError>;

    /// Lists items matching the filter, newest first
    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>, CoreError>;

    /// Appends a moderation report
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the reported item does not exist.
    async fn add_report(&self, report: &Report) -> Result<(), CoreError>;

    /// Lists reports for one item, oldest first
    async fn list_reports(&self, item_id: ItemId) -> Result<Vec<Report>, CoreError>;
}
