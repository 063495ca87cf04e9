//! Item Aggregate Root
//!
//! The Item aggregate is the consistency boundary for a published listing.
//! All lifecycle changes go through its methods so the invariants below
//! cannot be broken by callers.
//!
//! # Invariants
//!
//! - The status always belongs to the branch fixed by `kind` at creation
//! - `claims_count` equals the number of active (pending or approved) claims
//! - A resolved item keeps its terminal status forever

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ItemId, UserId};

use crate::error::ItemError;
use crate::status::{ItemKind, ItemStatus};

/// Geographic point attached to a listing
///
/// Stored verbatim; geocoding happens outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// How to reach the publisher outside the platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ContactInfo {
    /// True when neither channel is present
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none()
    }
}

/// Input for creating an item
///
/// Carries the publisher-supplied fields; [`Item::new`] validates them.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub coordinates: Option<Coordinates>,
    /// Ordered image references produced by the image pipeline
    pub images: Vec<String>,
    pub contact: Option<ContactInfo>,
    /// Listing managed by a police deposit
    pub police_deposit: bool,
    /// Link to the deposit's monthly bulletin, police listings only
    pub monthly_report_url: Option<String>,
}

/// Field-level patch for an item; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
}

impl ItemPatch {
    /// True when the patch would change nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.location.is_none()
    }
}

/// Raw field set used to rebuild an [`Item`] from storage
///
/// Only storage adapters should construct this; it bypasses creation
/// validation because the stored state already passed it.
#[derive(Debug, Clone)]
pub struct ItemParts {
    pub id: ItemId,
    pub kind: ItemKind,
    pub status: ItemStatus,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub coordinates: Option<Coordinates>,
    pub images: Vec<String>,
    pub contact: Option<ContactInfo>,
    pub police_deposit: bool,
    pub monthly_report_url: Option<String>,
    pub publisher: UserId,
    pub resolved: bool,
    pub claims_count: u32,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The Item aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique item identifier
    id: ItemId,
    /// Branch, fixed at creation
    kind: ItemKind,
    /// Current lifecycle status
    status: ItemStatus,
    title: String,
    description: String,
    /// Opaque category slug
    category: String,
    /// Free text location
    location: String,
    coordinates: Option<Coordinates>,
    /// Ordered image references
    images: Vec<String>,
    contact: Option<ContactInfo>,
    police_deposit: bool,
    monthly_report_url: Option<String>,
    /// Publishing user
    publisher: UserId,
    /// Set once, by resolution; never cleared
    resolved: bool,
    /// Count of active claims, kept in lockstep with the ledger
    claims_count: u32,
    /// Version for optimistic concurrency
    version: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Item {
    /// Creates a new item on the base state of `kind`
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::MissingField`] when a required text field is
    /// blank and [`ItemError::NoImages`] when no image reference was given.
    pub fn new(publisher: UserId, input: NewItem, kind: ItemKind) -> Result<Self, ItemError> {
        let title = required(input.title, "title")?;
        let description = required(input.description, "description")?;
        let category = required(input.category, "category")?;
        let location = required(input.location, "location")?;

        if input.images.is_empty() {
            return Err(ItemError::NoImages);
        }
        if input.images.iter().any(|image| image.trim().is_empty()) {
            return Err(ItemError::MissingField("images"));
        }

        let contact = input.contact.filter(|c| !c.is_empty());
        let now = Utc::now();

        Ok(Self {
            id: ItemId::new_v7(),
            kind,
            status: kind.base(),
            title,
            description,
            category,
            location,
            coordinates: input.coordinates,
            images: input.images,
            contact,
            police_deposit: input.police_deposit,
            monthly_report_url: input.monthly_report_url,
            publisher,
            resolved: false,
            claims_count: 0,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds an item from its stored field set
    pub fn restore(parts: ItemParts) -> Self {
        Self {
            id: parts.id,
            kind: parts.kind,
            status: parts.status,
            title: parts.title,
            description: parts.description,
            category: parts.category,
            location: parts.location,
            coordinates: parts.coordinates,
            images: parts.images,
            contact: parts.contact,
            police_deposit: parts.police_deposit,
            monthly_report_url: parts.monthly_report_url,
            publisher: parts.publisher,
            resolved: parts.resolved,
            claims_count: parts.claims_count,
            version: parts.version,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        }
    }

    /// Returns the item ID
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Returns the branch
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Returns the current status
    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn contact(&self) -> Option<&ContactInfo> {
        self.contact.as_ref()
    }

    pub fn police_deposit(&self) -> bool {
        self.police_deposit
    }

    pub fn monthly_report_url(&self) -> Option<&str> {
        self.monthly_report_url.as_deref()
    }

    /// Returns the publishing user
    pub fn publisher(&self) -> &UserId {
        &self.publisher
    }

    /// True once the publisher marked the item delivered/recovered
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Number of active claims
    pub fn claims_count(&self) -> u32 {
        self.claims_count
    }

    /// Version for optimistic concurrency
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Checks whether `user` published this item
    pub fn is_published_by(&self, user: &UserId) -> bool {
        &self.publisher == user
    }

    /// Applies a field patch
    ///
    /// Returns `true` when at least one field changed. Patched text fields
    /// must not be blank.
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::MissingField`] when a patched field is blank.
    pub fn apply_patch(&mut self, patch: ItemPatch) -> Result<bool, ItemError> {
        let mut changed = false;

        if let Some(title) = patch.title {
            let title = required(title, "title")?;
            if title != self.title {
                self.title = title;
                changed = true;
            }
        }
        if let Some(description) = patch.description {
            let description = required(description, "description")?;
            if description != self.description {
                self.description = description;
                changed = true;
            }
        }
        if let Some(category) = patch.category {
            let category = required(category, "category")?;
            if category != self.category {
                self.category = category;
                changed = true;
            }
        }
        if let Some(location) = patch.location {
            let location = required(location, "location")?;
            if location != self.location {
                self.location = location;
                changed = true;
            }
        }

        if changed {
            self.touch();
        }
        Ok(changed)
    }

    /// Records one more active claim
    ///
    /// Moves a base-state item to the branch pending state.
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::AlreadyResolved`] when the item is resolved.
    pub fn register_claim(&mut self) -> Result<(), ItemError> {
        if self.resolved {
            return Err(ItemError::AlreadyResolved);
        }

        self.claims_count += 1;
        if self.status.is_base() {
            self.status = self.kind.pending();
        }
        self.touch();
        Ok(())
    }

    /// Records that one active claim went away (rejected or withdrawn)
    ///
    /// When the last active claim is released on an unresolved item, the
    /// status reverts to the branch base.
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::CountUnderflow`] when no active claim is left
    /// to release; the ledger and the counter have diverged.
    pub fn release_claim(&mut self) -> Result<(), ItemError> {
        self.claims_count = self
            .claims_count
            .checked_sub(1)
            .ok_or(ItemError::CountUnderflow)?;

        if self.claims_count == 0 && !self.resolved && self.status.is_pending() {
            self.status = self.kind.base();
        }
        self.touch();
        Ok(())
    }

    /// Marks the item resolved and moves it to the branch terminal state
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::AlreadyResolved`] on a second resolution.
    pub fn resolve(&mut self) -> Result<(), ItemError> {
        if self.resolved {
            return Err(ItemError::AlreadyResolved);
        }

        self.resolved = true;
        self.status = self.kind.terminal();
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.version += 1;
    }
}

fn required(value: String, field: &'static str) -> Result<String, ItemError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ItemError::MissingField(field));
    }
    Ok(trimmed.to_string())
}
