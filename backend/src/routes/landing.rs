use serde::{Deserialize, Serialize};

use super::flights::FlightSummary;
use super::rankings::{PilotTotal, TakeoffCount};
use super::trends::HeatmapCell;

// =========================================================
// Home dashboard types + route
// =========================================================

/// Headline counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomeStats {
    pub total_flights: usize,
    /// Directory count, including pilots without flights.
    pub total_pilots: usize,
    /// Takeoffs with a flight in the past year.
    pub active_takeoffs: usize,
    pub total_km: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomeDashboard {
    pub stats: HomeStats,
    pub recent_flights: Vec<FlightSummary>,
    pub season_heatmap: Vec<HeatmapCell>,
    pub top_takeoffs: Vec<TakeoffCount>,
    pub top_pilots: Vec<PilotTotal>,
}

/// Route path for the home dashboard.
pub const GET_HOME: &str = "/home";
