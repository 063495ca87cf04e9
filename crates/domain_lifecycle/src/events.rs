//! Change events
//!
//! Every committed mutation produces events describing what changed. They
//! are used for:
//! - Real-time fan-out to connected clients
//! - Audit logging at the API edge
//!
//! Events are published after the commit succeeds, in commit order per
//! item, with at-most-once delivery. There is no replay: consumers that
//! miss events catch up by re-reading the item list.

use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, ItemId};
use domain_claims::Claim;
use domain_item::Item;

/// How a claim changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimChange {
    /// The publisher accepted the claim
    Approved,
    /// The publisher turned the claim down, or resolution did
    Rejected,
    /// The claimant withdrew; the claim left the ledger
    Withdrawn,
}

/// Events emitted by the lifecycle engine after a successful commit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// A new item was published
    ItemCreated { item: Item },

    /// Item fields or lifecycle status changed
    ItemUpdated { item: Item },

    /// The item was removed together with its claims and reports
    ItemDeleted { item_id: ItemId },

    /// A claim was filed against an item
    ClaimCreated { item_id: ItemId, claim: Claim },

    /// A claim was approved, rejected, or withdrawn
    ClaimUpdated {
        item_id: ItemId,
        claim_id: ClaimId,
        change: ClaimChange,
    },
}

impl ChangeEvent {
    /// Returns the item this event belongs to
    ///
    /// Per-item ordering is defined over this key.
    pub fn item_id(&self) -> ItemId {
        match self {
            ChangeEvent::ItemCreated { item } => item.id(),
            ChangeEvent::ItemUpdated { item } => item.id(),
            ChangeEvent::ItemDeleted { item_id } => *item_id,
            ChangeEvent::ClaimCreated { item_id, .. } => *item_id,
            ChangeEvent::ClaimUpdated { item_id, .. } => *item_id,
        }
    }

    /// Returns the event type name as it appears on the wire
    pub fn event_type(&self) -> &'static str {
        match self {
            ChangeEvent::ItemCreated { .. } => "item_created",
            ChangeEvent::ItemUpdated { .. } => "item_updated",
            ChangeEvent::ItemDeleted { .. } => "item_deleted",
            ChangeEvent::ClaimCreated { .. } => "claim_created",
            ChangeEvent::ClaimUpdated { .. } => "claim_updated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::UserId;
    use domain_item::{ItemKind, NewItem};

    fn sample_item() -> Item {
        Item::new(
            UserId::new("user-1"),
            NewItem {
                title: "Paraguas negro".to_string(),
                description: "Mango de madera".to_string(),
                category: "paraguas".to_string(),
                location: "Café Central".to_string(),
                coordinates: None,
                images: vec!["img/paraguas.jpg".to_string()],
                contact: None,
                police_deposit: false,
                monthly_report_url: None,
            },
            ItemKind::Found,
        )
        .unwrap()
    }

    #[test]
    fn test_events_are_tagged_with_snake_case_type() {
        let item = sample_item();
        let json = serde_json::to_value(ChangeEvent::ItemCreated { item: item.clone() }).unwrap();
        assert_eq!(json["type"], "item_created");

        let json = serde_json::to_value(ChangeEvent::ClaimUpdated {
            item_id: item.id(),
            claim_id: ClaimId::new(),
            change: ClaimChange::Withdrawn,
        })
        .unwrap();
        assert_eq!(json["type"], "claim_updated");
        assert_eq!(json["change"], "withdrawn");
    }

    #[test]
    fn test_item_id_accessor_covers_every_variant() {
        let item = sample_item();
        let id = item.id();
        let claim = Claim::new(id, UserId::new("user-2"), "es mío").unwrap();

        let events = [
            ChangeEvent::ItemCreated { item: item.clone() },
            ChangeEvent::ItemUpdated { item },
            ChangeEvent::ItemDeleted { item_id: id },
            ChangeEvent::ClaimCreated {
                item_id: id,
                claim: claim.clone(),
            },
            ChangeEvent::ClaimUpdated {
                item_id: id,
                claim_id: claim.id,
                change: ClaimChange::Approved,
            },
        ];
        for event in events {
            assert_eq!(event.item_id(), id);
        }
    }

    #[test]
    fn test_event_type_matches_wire_tag() {
        let item = sample_item();
        let event = ChangeEvent::ItemUpdated { item };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.event_type());
    }
}
