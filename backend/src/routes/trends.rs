use serde::{Deserialize, Serialize};

// =========================================================
// Time-bucket series types
// =========================================================

/// One (year, month) cell of the calendar heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub year: i32,
    pub month: u32,
    pub flight_count: usize,
    pub avg_score: f64,
}

/// Month-of-year aggregate (years collapsed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStat {
    pub month: u32,
    pub flight_count: usize,
    /// Absent for months without flights.
    pub avg_distance: Option<f64>,
}

/// Flight count for one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyBucket {
    pub hour: u32,
    pub flight_count: usize,
}

/// Flight count for one weekday (0 = Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayBucket {
    pub weekday: u32,
    pub flight_count: usize,
}

/// Per-year activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyStat {
    pub year: i32,
    pub flight_count: usize,
    pub total_km: f64,
    pub avg_distance: f64,
    pub max_distance: f64,
    pub pilot_count: usize,
}

/// Compact month entry used by the sparkline series of rollups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    pub month: u32,
    pub count: usize,
}
