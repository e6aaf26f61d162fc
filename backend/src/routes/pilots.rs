use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::distribution::HistogramBucket;
use super::flights::FlightSummary;
use super::trends::{HeatmapCell, YearlyStat};
use crate::api::{GliderId, PilotId, TakeoffId};
use crate::models::{GliderCategory, Pilot};

// =========================================================
// Pilot list/detail types + routes
// =========================================================

/// Favourite launch site of a pilot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavouriteTakeoff {
    pub takeoff_id: TakeoffId,
    pub name: String,
    pub flight_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotSummary {
    pub id: PilotId,
    pub name: String,
    pub username: String,
    pub flight_count: usize,
    pub total_km: f64,
    pub total_score: f64,
    pub avg_distance: f64,
    pub max_distance: f64,
    pub active_years: usize,
    pub last_flight: NaiveDateTime,
    pub favourite_takeoff: Option<FavouriteTakeoff>,
}

/// Career totals for one pilot. All values are absent or zero when the
/// pilot has no flights in the primary view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PilotStats {
    pub total_flights: usize,
    pub total_km: f64,
    pub total_score: f64,
    pub max_distance: Option<f64>,
    pub avg_distance: Option<f64>,
    pub active_since: Option<i32>,
    pub last_flight: Option<NaiveDateTime>,
}

/// A takeoff on the pilot's site map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteVisit {
    pub takeoff_id: TakeoffId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub flight_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentUsage {
    pub glider_id: GliderId,
    pub name: String,
    pub category: GliderCategory,
    pub flight_count: usize,
    pub first_used: NaiveDateTime,
    pub last_used: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotDetail {
    pub pilot: Pilot,
    pub stats: PilotStats,
    pub favourite_takeoff: Option<FavouriteTakeoff>,
    pub top_flights: Vec<FlightSummary>,
    pub heatmap: Vec<HeatmapCell>,
    pub histogram: Vec<HistogramBucket>,
    pub yearly: Vec<YearlyStat>,
    pub sites: Vec<SiteVisit>,
    pub equipment: Vec<EquipmentUsage>,
}

pub const LIST_PILOTS: &str = "/pilots";
pub const GET_PILOT: &str = "/pilots/{username}";
