//! HTTP API Layer
//!
//! This crate provides the REST and WebSocket API for the lost-and-found
//! core using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for items, claims, reports, user
//!   stats, the event stream, and health
//! - **Middleware**: Authentication, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    http::HeaderName,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_lifecycle::{LifecycleEngine, TransitionStore};
use infra_notify::ChangeHub;

use crate::config::ApiConfig;
use crate::handlers::{claims, events, health, items, reports, users};
use crate::middleware::{audit_middleware, auth_middleware};

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The lifecycle engine every mutation goes through
    pub engine: Arc<LifecycleEngine>,
    /// Direct store handle, used by the readiness probe
    pub store: Arc<dyn TransitionStore>,
    /// Fan-out hub backing the WebSocket event stream
    pub hub: Arc<ChangeHub>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// Reads under `/api/v1` are public; every mutation and every claim or
/// report read goes through the authentication and audit middleware.
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Public reads and the event stream
    let read_routes = Router::new()
        .route("/items", get(items::list_items))
        .route("/items/:id", get(items::get_item))
        .route("/users/:id/stats", get(users::user_stats))
        .route("/events/ws", get(events::events_ws));

    // Authenticated routes
    let protected_routes = Router::new()
        .route("/items", post(items::create_item))
        .route("/items/:id", put(items::update_item))
        .route("/items/:id", delete(items::delete_item))
        .route("/items/:id/resolve", post(items::resolve_item))
        .route("/items/:id/claims", post(claims::create_claim))
        .route("/items/:id/claims", get(claims::list_item_claims))
        .route("/claims/:id", get(claims::get_claim))
        .route("/claims/:id/status", put(claims::update_claim_status))
        .route("/claims/:id", delete(claims::delete_claim))
        .route("/items/:id/reports", post(reports::create_report))
        .route("/items/:id/reports", get(reports::list_item_reports))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            audit_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = read_routes.merge(protected_routes);

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
