//! Service layer for flight-log queries.
//!
//! Each function performs the scans one request needs against any
//! [`FullRepository`] and feeds the rows to the pure engines in
//! [`crate::services`]. Lookup misses come back as `Ok(None)`; store failures
//! propagate as [`RepositoryError`](super::RepositoryError).

use chrono::NaiveDateTime;

use super::repository::{FullRepository, RepositoryResult};
use crate::api::{
    FlightSummary, GliderId, HomeDashboard, Page, PilotDetail, PilotSummary, RecordsOverview,
    TakeoffDetail, TakeoffId, TakeoffSummary, WingDetail, WingSummary,
};
use crate::models::{FlightScope, FlightView};
use crate::services::filter::FlightQuery;
use crate::services::rankings::{
    busiest_days, category_breakdown, top_flights, top_gliders, top_takeoffs, TOP_FLIGHTS_LIMIT,
    TOP_GROUPS_LIMIT,
};
use crate::services::time_buckets::{
    calendar_heatmap, hourly_distribution, monthly_stats, weekday_distribution, yearly_stats,
};
use crate::services::{distance_histogram, home, listing, pilots, records, rollup};

/// Whether the store answers a no-op read. An empty store is healthy.
pub async fn health_check(repo: &dyn FullRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Filtered, sorted and paginated flight listing over the whole primary view.
pub async fn list_flights(
    repo: &dyn FullRepository,
    query: &FlightQuery,
) -> RepositoryResult<Page<FlightSummary>> {
    let flights = repo.scan_flights(FlightScope::All).await?;
    Ok(listing::list_flights(flights, query))
}

/// Landing page payload. `now` anchors the "recent" and "active" windows.
pub async fn home_dashboard(
    repo: &dyn FullRepository,
    now: NaiveDateTime,
) -> RepositoryResult<HomeDashboard> {
    let flights = repo.scan_flights(FlightScope::All).await?;
    let total_pilots = repo.count_pilots().await?;
    Ok(home::home_dashboard(&flights, total_pilots, now))
}

pub async fn records_overview(repo: &dyn FullRepository) -> RepositoryResult<RecordsOverview> {
    let flights = repo.scan_flights(FlightScope::All).await?;
    Ok(records::records_overview(&flights))
}

/// Every takeoff in the directory, busiest first.
pub async fn takeoff_list(repo: &dyn FullRepository) -> RepositoryResult<Vec<TakeoffSummary>> {
    let takeoffs = repo.list_takeoffs().await?;
    let flights = repo.scan_flights(FlightScope::All).await?;
    Ok(rollup::takeoff_summaries(&takeoffs, &flights))
}

pub async fn takeoff_detail(
    repo: &dyn FullRepository,
    id: TakeoffId,
) -> RepositoryResult<Option<TakeoffDetail>> {
    let Some(takeoff) = repo.get_takeoff(id).await? else {
        return Ok(None);
    };
    let flights = repo.scan_flights(FlightScope::Takeoff(id)).await?;
    let group: Vec<&FlightView> = flights.iter().collect();

    Ok(Some(TakeoffDetail {
        takeoff: rollup::takeoff_summary(&takeoff, &group),
        top_flights: top_flights(&flights, TOP_FLIGHTS_LIMIT),
        heatmap: calendar_heatmap(&flights),
        monthly: monthly_stats(&flights),
        hourly: hourly_distribution(&flights),
        weekday: weekday_distribution(&flights),
        histogram: distance_histogram(&flights),
        busiest_days: busiest_days(&flights, TOP_GROUPS_LIMIT),
        wing_classes: category_breakdown(&flights),
        top_gliders: top_gliders(&flights, TOP_GROUPS_LIMIT),
        yearly: yearly_stats(&flights),
    }))
}

/// Pilots with at least one primary-view flight, by total distance.
pub async fn pilot_list(repo: &dyn FullRepository) -> RepositoryResult<Vec<PilotSummary>> {
    let directory = repo.list_pilots().await?;
    let flights = repo.scan_flights(FlightScope::All).await?;
    Ok(pilots::pilot_summaries(&directory, &flights))
}

pub async fn pilot_detail(
    repo: &dyn FullRepository,
    username: &str,
) -> RepositoryResult<Option<PilotDetail>> {
    let Some(pilot) = repo.get_pilot_by_username(username).await? else {
        return Ok(None);
    };
    let flights = repo.scan_flights(FlightScope::Pilot(pilot.id)).await?;
    let group: Vec<&FlightView> = flights.iter().collect();

    Ok(Some(PilotDetail {
        stats: pilots::pilot_stats(&group),
        favourite_takeoff: pilots::favourite_takeoff(&group),
        top_flights: top_flights(&flights, TOP_FLIGHTS_LIMIT),
        heatmap: calendar_heatmap(&flights),
        histogram: distance_histogram(&flights),
        yearly: yearly_stats(&flights),
        sites: pilots::site_map(&group),
        equipment: pilots::equipment_timeline(&group),
        pilot,
    }))
}

/// Wings with at least one primary-view flight, by flight count.
pub async fn wing_list(repo: &dyn FullRepository) -> RepositoryResult<Vec<WingSummary>> {
    let gliders = repo.list_gliders().await?;
    let flights = repo.scan_flights(FlightScope::All).await?;
    Ok(rollup::wing_summaries(&gliders, &flights))
}

/// Detail page of one wing.
///
/// `None` for unknown ids and for wings with no primary-view flights, which
/// covers every hang glider.
pub async fn wing_detail(
    repo: &dyn FullRepository,
    id: GliderId,
) -> RepositoryResult<Option<WingDetail>> {
    let Some(glider) = repo.get_glider(id).await? else {
        return Ok(None);
    };
    let flights = repo.scan_flights(FlightScope::Glider(id)).await?;
    let group: Vec<&FlightView> = flights.iter().collect();
    let Some(wing) = rollup::wing_summary(&glider, &group) else {
        log::debug!("Wing {} has no flights in the primary view", id);
        return Ok(None);
    };

    let yearly = yearly_stats(&flights);
    Ok(Some(WingDetail {
        wing,
        top_flights: top_flights(&flights, TOP_FLIGHTS_LIMIT),
        histogram: distance_histogram(&flights),
        adoption: rollup::adoption_curve(&yearly),
        yearly,
        favourite_takeoffs: top_takeoffs(&flights, TOP_GROUPS_LIMIT),
        heatmap: calendar_heatmap(&flights),
    }))
}
