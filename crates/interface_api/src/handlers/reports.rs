//! Report handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::ItemId;

use crate::auth::CallerId;
use crate::dto::reports::{CreateReportRequest, ReportResponse};
use crate::error::ApiError;
use crate::AppState;

/// Files a moderation report against an item
pub async fn create_report(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(item_id): Path<Uuid>,
    Json(request): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<ReportResponse>), ApiError> {
    let (reason, description) = request.into_parts()?;
    let report = state
        .engine
        .add_report(ItemId::from(item_id), caller.0, reason, description)
        .await?;
    Ok((StatusCode::CREATED, Json(ReportResponse::from(report))))
}

/// Lists an item's reports; publisher only
pub async fn list_item_reports(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<Vec<ReportResponse>>, ApiError> {
    let reports = state
        .engine
        .list_reports(ItemId::from(item_id), &caller.0)
        .await?;
    Ok(Json(reports.into_iter().map(ReportResponse::from).collect()))
}
