//! Claim handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{ClaimId, ItemId};

use crate::auth::CallerId;
use crate::dto::claims::{ClaimResponse, CreateClaimRequest, UpdateClaimStatusRequest};
use crate::error::ApiError;
use crate::AppState;

/// Files a claim on an item
pub async fn create_claim(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(item_id): Path<Uuid>,
    Json(request): Json<CreateClaimRequest>,
) -> Result<(StatusCode, Json<ClaimResponse>), ApiError> {
    request.validate()?;
    let claim = state
        .engine
        .create_claim(ItemId::from(item_id), caller.0, request.message)
        .await?;
    Ok((StatusCode::CREATED, Json(ClaimResponse::from(claim))))
}

/// Lists an item's claims
///
/// The publisher sees the whole ledger; anyone else sees only their own.
pub async fn list_item_claims(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    let claims = state
        .engine
        .list_claims(ItemId::from(item_id), &caller.0)
        .await?;
    Ok(Json(claims.into_iter().map(ClaimResponse::from).collect()))
}

/// Gets one claim; visible to the claimant and the item's publisher
pub async fn get_claim(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state.engine.get_claim(ClaimId::from(id), &caller.0).await?;
    Ok(Json(ClaimResponse::from(claim)))
}

/// Approves or rejects a pending claim; publisher only
pub async fn update_claim_status(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateClaimStatusRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let decision = request.into_decision()?;
    let claim = state
        .engine
        .update_claim_status(ClaimId::from(id), &caller.0, decision)
        .await?;
    Ok(Json(ClaimResponse::from(claim)))
}

/// Withdraws a claim; claimant only
pub async fn delete_claim(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .engine
        .delete_claim(ClaimId::from(id), &caller.0)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
