//! Home dashboard rollup.

use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime};

use super::numeric::round_to;
use super::rankings::{
    recent_notable_flights, top_pilots, top_takeoffs, RECENT_FLIGHTS_LIMIT, TOP_GROUPS_LIMIT,
};
use super::time_buckets::calendar_heatmap;
use crate::api::{HomeDashboard, HomeStats};
use crate::models::FlightView;

/// A takeoff counts as active with a flight in this many days before "now".
pub const ACTIVE_TAKEOFF_WINDOW_DAYS: i64 = 365;

pub fn home_stats(flights: &[FlightView], total_pilots: usize, now: NaiveDateTime) -> HomeStats {
    let since = now - Duration::days(ACTIVE_TAKEOFF_WINDOW_DAYS);
    let active: HashSet<_> = flights
        .iter()
        .filter(|f| f.start_time > since)
        .filter_map(|f| f.takeoff_id())
        .collect();

    HomeStats {
        total_flights: flights.len(),
        total_pilots,
        active_takeoffs: active.len(),
        total_km: round_to(flights.iter().map(|f| f.distance_km).sum(), 0),
    }
}

pub fn home_dashboard(
    flights: &[FlightView],
    total_pilots: usize,
    now: NaiveDateTime,
) -> HomeDashboard {
    HomeDashboard {
        stats: home_stats(flights, total_pilots, now),
        recent_flights: recent_notable_flights(flights, now, RECENT_FLIGHTS_LIMIT),
        season_heatmap: calendar_heatmap(flights),
        top_takeoffs: top_takeoffs(flights, TOP_GROUPS_LIMIT),
        top_pilots: top_pilots(flights, TOP_GROUPS_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dashboard() {
        let now = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let dashboard = home_dashboard(&[], 4, now);
        assert_eq!(dashboard.stats.total_flights, 0);
        assert_eq!(dashboard.stats.total_pilots, 4);
        assert_eq!(dashboard.stats.total_km, 0.0);
        assert!(dashboard.recent_flights.is_empty());
        assert!(dashboard.top_takeoffs.is_empty());
    }
}
