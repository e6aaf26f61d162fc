use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::distribution::HistogramBucket;
use super::flights::FlightSummary;
use super::rankings::TakeoffCount;
use super::trends::{HeatmapCell, MonthCount, YearlyStat};
use crate::api::GliderId;
use crate::models::GliderCategory;

// =========================================================
// Wing list/detail types + routes
// =========================================================

/// One glider model with at least one flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WingSummary {
    pub id: GliderId,
    pub name: String,
    pub category: GliderCategory,
    pub flight_count: usize,
    pub pilot_count: usize,
    pub total_km: f64,
    pub avg_distance: f64,
    pub max_distance: f64,
    /// km/h over flights with recorded airtime.
    pub avg_speed: Option<f64>,
    pub first_year: i32,
    pub last_year: i32,
    pub last_flight: NaiveDateTime,
    pub xc_potential: f64,
    pub weekend_pct: u32,
    pub flights_100k: usize,
    pub monthly: Vec<MonthCount>,
}

/// Distinct pilots flying a wing in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptionPoint {
    pub year: i32,
    pub pilot_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WingDetail {
    pub wing: WingSummary,
    pub top_flights: Vec<FlightSummary>,
    pub histogram: Vec<HistogramBucket>,
    pub adoption: Vec<AdoptionPoint>,
    pub yearly: Vec<YearlyStat>,
    pub favourite_takeoffs: Vec<TakeoffCount>,
    pub heatmap: Vec<HeatmapCell>,
}

pub const LIST_WINGS: &str = "/wings";
pub const GET_WING: &str = "/wings/{id}";
