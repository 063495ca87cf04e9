//! Item handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::ItemId;

use crate::auth::CallerId;
use crate::dto::items::{
    CreateItemRequest, ItemDetailResponse, ItemQuery, ItemResponse, UpdateItemRequest,
};
use crate::error::ApiError;
use crate::AppState;

/// Publishes a new item
pub async fn create_item(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Json(request): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    request.validate()?;
    let (input, kind) = request.into_parts();
    let item = state.engine.create_item(caller.0, input, kind).await?;
    Ok((StatusCode::CREATED, Json(ItemResponse::from(item))))
}

/// Lists items matching the query, newest first
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ItemQuery>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let filter = query.into_filter()?;
    let items = state.engine.list_items(&filter).await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// Gets one item with its claims and derived claimer
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemDetailResponse>, ApiError> {
    let detail = state.engine.get_item(ItemId::from(id)).await?;
    Ok(Json(ItemDetailResponse::from(detail)))
}

/// Updates item fields; publisher only
pub async fn update_item(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    let update = request.into_update()?;
    let item = state
        .engine
        .update_item_fields(ItemId::from(id), &caller.0, update)
        .await?;
    Ok(Json(ItemResponse::from(item)))
}

/// Deletes an item together with its claims and reports; publisher only
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.engine.delete_item(ItemId::from(id), &caller.0).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Marks an item delivered/recovered; publisher only
pub async fn resolve_item(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerId>,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = state.engine.set_resolved(ItemId::from(id), &caller.0).await?;
    Ok(Json(ItemResponse::from(item)))
}
