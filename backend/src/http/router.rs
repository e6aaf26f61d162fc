//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;
use crate::routes::{flights, landing, pilots, records, takeoffs, wings};

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Read-only API, any origin may query it.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route(flights::LIST_FLIGHTS, get(handlers::list_flights))
        .route(landing::GET_HOME, get(handlers::get_home))
        .route(records::GET_RECORDS, get(handlers::get_records))
        .route(takeoffs::LIST_TAKEOFFS, get(handlers::list_takeoffs))
        .route(takeoffs::GET_TAKEOFF, get(handlers::get_takeoff))
        .route(pilots::LIST_PILOTS, get(handlers::list_pilots))
        .route(pilots::GET_PILOT, get(handlers::get_pilot))
        .route(wings::LIST_WINGS, get(handlers::list_wings))
        .route(wings::GET_WING, get(handlers::get_wing));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
