use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::api::{FlightId, GliderId, PilotId, TakeoffId};
use crate::models::{FlightView, GliderCategory};

// =========================================================
// Flight listing types + route
// =========================================================

/// Flight row as returned to callers of listings, leaderboards and records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSummary {
    pub id: FlightId,
    pub start_time: NaiveDateTime,
    pub distance_km: f64,
    pub score: f64,
    pub airtime: u32,
    #[serde(rename = "type")]
    pub flight_type: String,
    pub url: String,
    pub pilot_id: PilotId,
    pub pilot_name: String,
    pub pilot_username: String,
    pub takeoff_id: Option<TakeoffId>,
    pub takeoff_name: Option<String>,
    pub glider_id: GliderId,
    pub glider_name: String,
    pub glider_category: GliderCategory,
}

impl From<&FlightView> for FlightSummary {
    fn from(view: &FlightView) -> Self {
        Self {
            id: view.id,
            start_time: view.start_time,
            distance_km: view.distance_km,
            score: view.score,
            airtime: view.airtime,
            flight_type: view.flight_type.clone(),
            url: view.url.clone(),
            pilot_id: view.pilot.id,
            pilot_name: view.pilot.name.clone(),
            pilot_username: view.pilot.username.clone(),
            takeoff_id: view.takeoff_id(),
            takeoff_name: view.takeoff.as_ref().map(|t| t.name.clone()),
            glider_id: view.glider.id,
            glider_name: view.glider.name.clone(),
            glider_category: view.glider.category,
        }
    }
}

/// Paginated list envelope.
///
/// `total` counts the whole filtered set, not the slice in `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    #[serde(rename = "pageSize")]
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Route path for the filtered flight listing.
pub const LIST_FLIGHTS: &str = "/flights";
