//! User handlers

use axum::{
    extract::{Path, State},
    Json,
};

use core_kernel::UserId;

use crate::dto::users::UserStatsResponse;
use crate::error::ApiError;
use crate::AppState;

/// Returns a user's public activity counters
pub async fn user_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserStatsResponse>, ApiError> {
    let stats = state.engine.user_stats(&UserId::new(id)).await?;
    Ok(Json(UserStatsResponse::from(stats)))
}
