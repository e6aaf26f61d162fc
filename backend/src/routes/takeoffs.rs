use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::distribution::HistogramBucket;
use super::flights::FlightSummary;
use super::rankings::{CategoryCount, DayActivity, GliderCount};
use super::trends::{HeatmapCell, HourlyBucket, MonthCount, MonthlyStat, WeekdayBucket, YearlyStat};
use crate::api::TakeoffId;

// =========================================================
// Takeoff list/detail types + routes
// =========================================================

/// One row of the takeoff directory, with flight rollups.
///
/// Sites without flights still appear: counts are zero and the
/// distance-derived values are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeoffSummary {
    pub id: TakeoffId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub flight_count: usize,
    pub pilot_count: usize,
    pub record_km: Option<f64>,
    pub last_flight: Option<NaiveDateTime>,
    /// Mean distance of the site's ten longest flights.
    pub xc_potential: Option<f64>,
    pub weekend_pct: u32,
    pub flights_100k: usize,
    pub avg_distance: Option<f64>,
    /// Share of flights on A/B wings.
    pub beginner_pct: u32,
    pub monthly: Vec<MonthCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeoffDetail {
    pub takeoff: TakeoffSummary,
    pub top_flights: Vec<FlightSummary>,
    pub heatmap: Vec<HeatmapCell>,
    pub monthly: Vec<MonthlyStat>,
    pub hourly: Vec<HourlyBucket>,
    pub weekday: Vec<WeekdayBucket>,
    pub histogram: Vec<HistogramBucket>,
    pub busiest_days: Vec<DayActivity>,
    pub wing_classes: Vec<CategoryCount>,
    pub top_gliders: Vec<GliderCount>,
    pub yearly: Vec<YearlyStat>,
}

pub const LIST_TAKEOFFS: &str = "/takeoffs";
pub const GET_TAKEOFF: &str = "/takeoffs/{id}";
