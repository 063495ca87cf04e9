//! Item lifecycle states
//!
//! An item lives on exactly one of two branches, fixed at creation:
//!
//! ```text
//! lost:  perdido    -> pendiente_recuperacion -> recuperado
//! found: encontrado -> pendiente_entrega      -> entregado
//! ```
//!
//! Pending states are claim-derived: the first active claim moves an item
//! off its base state, releasing the last one moves it back. The legacy
//! `reclamado` label is a display alias for the two pending states and is
//! never stored.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ItemError;

/// Which branch of the marketplace an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Posted by someone who lost the item
    #[serde(rename = "perdido")]
    Lost,
    /// Posted by someone who found the item
    #[serde(rename = "encontrado")]
    Found,
}

impl ItemKind {
    /// The state a freshly created item starts in
    pub fn base(&self) -> ItemStatus {
        match self {
            ItemKind::Lost => ItemStatus::Lost,
            ItemKind::Found => ItemStatus::Found,
        }
    }

    /// The claim-derived intermediate state of this branch
    pub fn pending(&self) -> ItemStatus {
        match self {
            ItemKind::Lost => ItemStatus::PendingRecovery,
            ItemKind::Found => ItemStatus::PendingDelivery,
        }
    }

    /// The final state of this branch
    pub fn terminal(&self) -> ItemStatus {
        match self {
            ItemKind::Lost => ItemStatus::Recovered,
            ItemKind::Found => ItemStatus::Delivered,
        }
    }

    /// Canonical wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Lost => "perdido",
            ItemKind::Found => "encontrado",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "perdido" => Ok(ItemKind::Lost),
            "encontrado" => Ok(ItemKind::Found),
            other => Err(ItemError::UnknownKind(other.to_string())),
        }
    }
}

/// Item lifecycle status
///
/// A closed set of six states, three per branch. Transitions outside
/// [`ItemStatus::can_transition_to`] are rejected by the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStatus {
    /// Lost item, no active claims
    #[serde(rename = "perdido")]
    Lost,
    /// Found item, no active claims
    #[serde(rename = "encontrado")]
    Found,
    /// Lost item with at least one active claim
    #[serde(rename = "pendiente_recuperacion")]
    PendingRecovery,
    /// Found item with at least one active claim
    #[serde(rename = "pendiente_entrega")]
    PendingDelivery,
    /// Lost item returned to its owner; terminal
    #[serde(rename = "recuperado")]
    Recovered,
    /// Found item handed over; terminal
    #[serde(rename = "entregado")]
    Delivered,
}

impl ItemStatus {
    /// The branch this status belongs to
    pub fn branch(&self) -> ItemKind {
        match self {
            ItemStatus::Lost | ItemStatus::PendingRecovery | ItemStatus::Recovered => {
                ItemKind::Lost
            }
            ItemStatus::Found | ItemStatus::PendingDelivery | ItemStatus::Delivered => {
                ItemKind::Found
            }
        }
    }

    /// True for the two branch base states
    pub fn is_base(&self) -> bool {
        matches!(self, ItemStatus::Lost | ItemStatus::Found)
    }

    /// True for the two claim-derived pending states
    pub fn is_pending(&self) -> bool {
        matches!(self, ItemStatus::PendingRecovery | ItemStatus::PendingDelivery)
    }

    /// True for the two final states
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Recovered | ItemStatus::Delivered)
    }

    /// Canonical wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Lost => "perdido",
            ItemStatus::Found => "encontrado",
            ItemStatus::PendingRecovery => "pendiente_recuperacion",
            ItemStatus::PendingDelivery => "pendiente_entrega",
            ItemStatus::Recovered => "recuperado",
            ItemStatus::Delivered => "entregado",
        }
    }

    /// Label shown to users; folds both pending states into `reclamado`
    pub fn display_label(&self) -> &'static str {
        if self.is_pending() {
            "reclamado"
        } else {
            self.as_str()
        }
    }

    /// Checks if transition is valid
    ///
    /// Base and pending states move only within their branch; terminal
    /// states have no outgoing transitions.
    pub fn can_transition_to(&self, target: ItemStatus) -> bool {
        use ItemStatus::*;
        matches!(
            (self, target),
            (Lost, PendingRecovery)
                | (PendingRecovery, Lost)
                | (PendingRecovery, Recovered)
                | (Lost, Recovered)
                | (Found, PendingDelivery)
                | (PendingDelivery, Found)
                | (PendingDelivery, Delivered)
                | (Found, Delivered)
        )
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "perdido" => Ok(ItemStatus::Lost),
            "encontrado" => Ok(ItemStatus::Found),
            "pendiente_recuperacion" => Ok(ItemStatus::PendingRecovery),
            "pendiente_entrega" => Ok(ItemStatus::PendingDelivery),
            "recuperado" => Ok(ItemStatus::Recovered),
            "entregado" => Ok(ItemStatus::Delivered),
            other => Err(ItemError::UnknownStatus(other.to_string())),
        }
    }
}
