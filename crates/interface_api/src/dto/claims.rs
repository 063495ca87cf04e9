//! Claim DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ClaimId, ItemId, UserId};
use domain_claims::{Claim, ClaimStatus};
use domain_lifecycle::ClaimDecision;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClaimRequest {
    /// Message to the publisher ("this is mine because ...")
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateClaimStatusRequest {
    /// `aprobada` or `rechazada`
    pub status: String,
}

impl UpdateClaimStatusRequest {
    pub fn into_decision(self) -> Result<ClaimDecision, ApiError> {
        match self.status.as_str() {
            "aprobada" => Ok(ClaimDecision::Approve),
            "rechazada" => Ok(ClaimDecision::Reject),
            other => Err(ApiError::Validation(format!(
                "unknown claim decision: {other}"
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub id: ClaimId,
    pub item_id: ItemId,
    pub claimant: UserId,
    pub message: String,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            id: claim.id,
            item_id: claim.item_id,
            claimant: claim.claimant,
            message: claim.message,
            status: claim.status,
            created_at: claim.created_at,
            updated_at: claim.updated_at,
        }
    }
}
