//! Claim entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ClaimId, ItemId, UserId};

use crate::error::ClaimError;

/// Claim status
///
/// Pending and Approved claims are *active*: they hold the item in its
/// pending state and count towards `claims_count`. Rejected claims stay in
/// the ledger as history but carry no further effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// Awaiting the publisher's decision
    #[serde(rename = "pendiente")]
    Pending,
    /// Accepted by the publisher; the claimant becomes the designated claimer
    #[serde(rename = "aprobada")]
    Approved,
    /// Turned down, explicitly or implicitly at resolution
    #[serde(rename = "rechazada")]
    Rejected,
}

impl ClaimStatus {
    /// True for statuses that hold the item in its pending state
    pub fn is_active(&self) -> bool {
        matches!(self, ClaimStatus::Pending | ClaimStatus::Approved)
    }

    /// Canonical wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pendiente",
            ClaimStatus::Approved => "aprobada",
            ClaimStatus::Rejected => "rechazada",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(ClaimStatus::Pending),
            "aprobada" => Ok(ClaimStatus::Approved),
            "rechazada" => Ok(ClaimStatus::Rejected),
            other => Err(ClaimError::UnknownStatus(other.to_string())),
        }
    }
}

/// A claim on a published item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Claimed item
    pub item_id: ItemId,
    /// Claiming user
    pub claimant: UserId,
    /// Message to the publisher ("this is mine because ...")
    pub message: String,
    /// Status
    pub status: ClaimStatus,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Creates a new pending claim
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::EmptyMessage`] when the message is blank.
    pub fn new(
        item_id: ItemId,
        claimant: UserId,
        message: impl Into<String>,
    ) -> Result<Self, ClaimError> {
        let message = message.into();
        let message = message.trim();
        if message.is_empty() {
            return Err(ClaimError::EmptyMessage);
        }

        let now = Utc::now();
        Ok(Self {
            id: ClaimId::new_v7(),
            item_id,
            claimant,
            message: message.to_string(),
            status: ClaimStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Marks the claim approved
    pub fn approve(&mut self) -> Result<(), ClaimError> {
        self.transition(ClaimStatus::Approved)
    }

    /// Marks the claim rejected
    pub fn reject(&mut self) -> Result<(), ClaimError> {
        self.transition(ClaimStatus::Rejected)
    }

    fn transition(&mut self, target: ClaimStatus) -> Result<(), ClaimError> {
        if !self.can_transition_to(target) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }
        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Checks if transition is valid
    ///
    /// Only pending claims move; approval and rejection are both final.
    fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self.status, target),
            (Pending, Approved) | (Pending, Rejected)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claim_is_pending() {
        let claim = Claim::new(ItemId::new(), UserId::new("user-2"), "Es mi cartera").unwrap();
        assert_eq!(claim.status, ClaimStatus::Pending);
        assert!(claim.status.is_active());
    }

    #[test]
    fn test_blank_message_is_rejected() {
        let result = Claim::new(ItemId::new(), UserId::new("user-2"), "   ");
        assert!(matches!(result, Err(ClaimError::EmptyMessage)));
    }

    #[test]
    fn test_approved_claim_cannot_move_again() {
        let mut claim = Claim::new(ItemId::new(), UserId::new("user-2"), "mía").unwrap();
        claim.approve().unwrap();
        assert!(claim.reject().is_err());
        assert!(claim.approve().is_err());
        assert_eq!(claim.status, ClaimStatus::Approved);
    }

    #[test]
    fn test_rejected_claim_is_inactive() {
        let mut claim = Claim::new(ItemId::new(), UserId::new("user-2"), "mía").unwrap();
        claim.reject().unwrap();
        assert!(!claim.status.is_active());
    }
}
