use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::flights::FlightSummary;
use crate::api::{PilotId, TakeoffId};
use crate::models::GliderCategory;

// =========================================================
// Records types + route
// =========================================================

/// Longest flight of one glider class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub category: GliderCategory,
    pub flight: FlightSummary,
}

/// Longest flight of one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualRecord {
    pub year: i32,
    pub flight: FlightSummary,
}

/// Longest flight launched from one takeoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub takeoff_id: TakeoffId,
    pub takeoff_name: String,
    pub flight: FlightSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllTimeRecords {
    pub longest: Option<FlightSummary>,
    pub highest_score: Option<FlightSummary>,
    /// Longest airtime, ignoring implausible tracks above ten hours.
    pub longest_airtime: Option<FlightSummary>,
}

/// Day with the most pilots crossing 300 km.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpicDay {
    pub day: NaiveDate,
    pub pilots_300k: usize,
    pub pilot_count: usize,
    pub flight_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusiestDay {
    pub day: NaiveDate,
    pub flight_count: usize,
    pub pilot_count: usize,
}

/// Pilot that wins a counting superlative (distinct sites, distinct years).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilotSuperlative {
    pub pilot_id: PilotId,
    pub name: String,
    pub username: String,
    pub value: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunStats {
    pub epic_day: Option<EpicDay>,
    pub busiest_day: Option<BusiestDay>,
    pub most_sites_pilot: Option<PilotSuperlative>,
    pub most_consistent_pilot: Option<PilotSuperlative>,
}

/// Everything the records page shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordsOverview {
    pub all_time: AllTimeRecords,
    pub by_category: Vec<CategoryRecord>,
    pub by_year: Vec<AnnualRecord>,
    pub by_takeoff: Vec<SiteRecord>,
    pub fun: FunStats,
}

/// Route path for the records overview.
pub const GET_RECORDS: &str = "/records";
