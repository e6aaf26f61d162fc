//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to
//! [`crate::db::services`].

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{
    FlightSummary, HealthResponse, HomeDashboard, Page, PilotDetail, PilotSummary,
    RecordsOverview, TakeoffDetail, TakeoffSummary, WingDetail, WingSummary,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{GliderId, TakeoffId};
use crate::db::services as db_services;
use crate::services::FlightQuery;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// 200 when the store answers a no-op read, 503 otherwise.
pub async fn health_check(State(state): State<AppState>) -> Response {
    match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => (StatusCode::OK, Json(HealthResponse::ok())).into_response(),
        Ok(false) => {
            tracing::warn!("health check reported the store as down");
            (StatusCode::SERVICE_UNAVAILABLE, Json(HealthResponse::error())).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(HealthResponse::error())).into_response()
        }
    }
}

// =============================================================================
// Flights
// =============================================================================

/// GET /v1/flights
///
/// Query keys: `pilot`, `takeoff`, `dateFrom`, `dateTo`, `distMin`, `distMax`,
/// `type`, `category`, `sortBy`, `sortDir`, `page`, `pageSize`.
pub async fn list_flights(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> HandlerResult<Page<FlightSummary>> {
    let query = FlightQuery::from_params(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
    let page = db_services::list_flights(state.repository.as_ref(), &query).await?;
    Ok(Json(page))
}

// =============================================================================
// Dashboards
// =============================================================================

/// GET /v1/home
pub async fn get_home(State(state): State<AppState>) -> HandlerResult<HomeDashboard> {
    let dashboard = db_services::home_dashboard(state.repository.as_ref(), state.now()).await?;
    Ok(Json(dashboard))
}

/// GET /v1/records
pub async fn get_records(State(state): State<AppState>) -> HandlerResult<RecordsOverview> {
    let records = db_services::records_overview(state.repository.as_ref()).await?;
    Ok(Json(records))
}

// =============================================================================
// Takeoffs
// =============================================================================

/// GET /v1/takeoffs
pub async fn list_takeoffs(State(state): State<AppState>) -> HandlerResult<Vec<TakeoffSummary>> {
    Ok(Json(db_services::takeoff_list(state.repository.as_ref()).await?))
}

/// GET /v1/takeoffs/{id}
pub async fn get_takeoff(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<TakeoffDetail> {
    db_services::takeoff_detail(state.repository.as_ref(), TakeoffId::new(id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Takeoff {} not found", id)))
}

// =============================================================================
// Pilots
// =============================================================================

/// GET /v1/pilots
pub async fn list_pilots(State(state): State<AppState>) -> HandlerResult<Vec<PilotSummary>> {
    Ok(Json(db_services::pilot_list(state.repository.as_ref()).await?))
}

/// GET /v1/pilots/{username}
pub async fn get_pilot(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> HandlerResult<PilotDetail> {
    db_services::pilot_detail(state.repository.as_ref(), &username)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Pilot '{}' not found", username)))
}

// =============================================================================
// Wings
// =============================================================================

/// GET /v1/wings
pub async fn list_wings(State(state): State<AppState>) -> HandlerResult<Vec<WingSummary>> {
    Ok(Json(db_services::wing_list(state.repository.as_ref()).await?))
}

/// GET /v1/wings/{id}
pub async fn get_wing(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<WingDetail> {
    db_services::wing_detail(state.repository.as_ref(), GliderId::new(id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Wing {} not found", id)))
}
