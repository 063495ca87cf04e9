//! Item DTOs
//!
//! Wire shapes for listings. Statuses travel under their Spanish names;
//! the legacy `reclamado` label is accepted as a filter (it expands to
//! both pending states) and surfaced on responses as `display_status`,
//! but it is never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ItemId, UserId};
use domain_item::{ContactInfo, Coordinates, Item, ItemFilter, ItemKind, ItemPatch, ItemStatus};
use domain_lifecycle::{ItemDetail, ItemUpdate};

use crate::dto::claims::ClaimResponse;
use crate::error::ApiError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    pub kind: ItemKind,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 4000))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 300))]
    pub location: String,
    pub coordinates: Option<Coordinates>,
    #[validate(length(min = 1))]
    pub images: Vec<String>,
    pub contact: Option<ContactInfo>,
    #[serde(default)]
    pub police_deposit: bool,
    pub monthly_report_url: Option<String>,
}

impl CreateItemRequest {
    pub fn into_parts(self) -> (domain_item::NewItem, ItemKind) {
        let kind = self.kind;
        let input = domain_item::NewItem {
            title: self.title,
            description: self.description,
            category: self.category,
            location: self.location,
            coordinates: self.coordinates,
            images: self.images,
            contact: self.contact,
            police_deposit: self.police_deposit,
            monthly_report_url: self.monthly_report_url,
        };
        (input, kind)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    /// Requested status by wire name; the engine only honors the current
    /// value or the branch terminal
    pub status: Option<String>,
}

impl UpdateItemRequest {
    pub fn into_update(self) -> Result<ItemUpdate, ApiError> {
        let status = self
            .status
            .map(|raw| {
                raw.parse::<ItemStatus>()
                    .map_err(|e| ApiError::Validation(e.to_string()))
            })
            .transpose()?;

        Ok(ItemUpdate {
            fields: ItemPatch {
                title: self.title,
                description: self.description,
                category: self.category,
                location: self.location,
            },
            status,
        })
    }
}

/// Query parameters for `GET /items`
#[derive(Debug, Default, Deserialize)]
pub struct ItemQuery {
    /// Comma-separated status wire names; `reclamado` expands to both
    /// pending states
    pub status: Option<String>,
    pub kind: Option<String>,
    pub category: Option<String>,
    /// Substring match on the location field
    pub location: Option<String>,
    /// Free-text search over title and description
    pub q: Option<String>,
    pub publisher: Option<String>,
    pub police_deposit: Option<bool>,
}

impl ItemQuery {
    pub fn into_filter(self) -> Result<ItemFilter, ApiError> {
        let mut statuses = Vec::new();
        if let Some(raw) = self.status {
            for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                if token == "reclamado" {
                    statuses.push(ItemStatus::PendingRecovery);
                    statuses.push(ItemStatus::PendingDelivery);
                } else {
                    statuses.push(
                        token
                            .parse::<ItemStatus>()
                            .map_err(|e| ApiError::Validation(e.to_string()))?,
                    );
                }
            }
        }

        let kind = self
            .kind
            .map(|raw| {
                raw.parse::<ItemKind>()
                    .map_err(|e| ApiError::Validation(e.to_string()))
            })
            .transpose()?;

        Ok(ItemFilter {
            statuses,
            kind,
            category: self.category,
            location: self.location,
            text: self.q,
            publisher: self.publisher.map(UserId::new),
            police_deposit: self.police_deposit,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: ItemId,
    pub kind: ItemKind,
    pub status: ItemStatus,
    /// User-facing label; folds both pending states into `reclamado`
    pub display_status: &'static str,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactInfo>,
    pub police_deposit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_report_url: Option<String>,
    pub publisher: UserId,
    pub resolved: bool,
    pub claims_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id(),
            kind: item.kind(),
            status: item.status(),
            display_status: item.status().display_label(),
            title: item.title().to_string(),
            description: item.description().to_string(),
            category: item.category().to_string(),
            location: item.location().to_string(),
            coordinates: item.coordinates(),
            images: item.images().to_vec(),
            contact: item.contact().cloned(),
            police_deposit: item.police_deposit(),
            monthly_report_url: item.monthly_report_url().map(str::to_string),
            publisher: item.publisher().clone(),
            resolved: item.is_resolved(),
            claims_count: item.claims_count(),
            created_at: item.created_at(),
            updated_at: item.updated_at(),
        }
    }
}

/// Item with its claim ledger and the derived claimer
#[derive(Debug, Serialize)]
pub struct ItemDetailResponse {
    #[serde(flatten)]
    pub item: ItemResponse,
    pub claims: Vec<ClaimResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimer: Option<UserId>,
}

impl From<ItemDetail> for ItemDetailResponse {
    fn from(detail: ItemDetail) -> Self {
        Self {
            item: ItemResponse::from(detail.item),
            claims: detail.claims.into_iter().map(ClaimResponse::from).collect(),
            claimer: detail.claimer,
        }
    }
}
