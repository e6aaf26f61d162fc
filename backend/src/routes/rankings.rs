use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{GliderId, PilotId, TakeoffId};
use crate::models::GliderCategory;

// =========================================================
// Leaderboard entry types
// =========================================================

/// Takeoff ranked by number of flights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeoffCount {
    pub takeoff_id: TakeoffId,
    pub name: String,
    pub flight_count: usize,
}

/// Glider model ranked by usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GliderCount {
    pub glider_id: GliderId,
    pub name: String,
    pub category: GliderCategory,
    pub flight_count: usize,
}

/// Flight count for one glider class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: GliderCategory,
    pub flight_count: usize,
}

/// Pilot ranked by accumulated distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotTotal {
    pub pilot_id: PilotId,
    pub name: String,
    pub username: String,
    pub flight_count: usize,
    /// Rounded to whole kilometres.
    pub total_km: f64,
}

/// Activity on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayActivity {
    pub day: NaiveDate,
    pub pilot_count: usize,
    pub flight_count: usize,
    pub max_distance: f64,
}
