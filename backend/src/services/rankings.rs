//! Top-N leaderboards.
//!
//! Every ranking sorts descending by its metric and breaks ties on the
//! identifier (ascending) or, for day groups, on the earlier day.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::numeric::round_to;
use crate::api::{
    CategoryCount, DayActivity, FlightSummary, GliderCount, GliderId, PilotId, PilotTotal,
    TakeoffCount, TakeoffId,
};
use crate::models::{FlightView, GliderCategory};

pub const TOP_FLIGHTS_LIMIT: usize = 10;
pub const TOP_GROUPS_LIMIT: usize = 5;
pub const RECENT_FLIGHTS_LIMIT: usize = 20;
/// Distance a recent flight must exceed to be notable.
pub const NOTABLE_DISTANCE_KM: f64 = 50.0;
pub const RECENT_WINDOW_DAYS: i64 = 30;

fn top_n<T, F>(mut items: Vec<T>, n: usize, order: F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    items.sort_by(order);
    items.truncate(n);
    items
}

/// Longest-first ordering with lowest id winning ties.
pub fn by_distance_desc(a: &FlightView, b: &FlightView) -> Ordering {
    b.distance_km
        .total_cmp(&a.distance_km)
        .then_with(|| a.id.cmp(&b.id))
}

pub fn top_flights(flights: &[FlightView], n: usize) -> Vec<FlightSummary> {
    let refs: Vec<&FlightView> = flights.iter().collect();
    top_n(refs, n, |a, b| by_distance_desc(a, b))
        .into_iter()
        .map(FlightSummary::from)
        .collect()
}

/// Flights longer than [`NOTABLE_DISTANCE_KM`] started within the last
/// [`RECENT_WINDOW_DAYS`] before `now`, longest first.
pub fn recent_notable_flights(
    flights: &[FlightView],
    now: NaiveDateTime,
    n: usize,
) -> Vec<FlightSummary> {
    let since = now - Duration::days(RECENT_WINDOW_DAYS);
    let recent: Vec<&FlightView> = flights
        .iter()
        .filter(|f| f.distance_km > NOTABLE_DISTANCE_KM && f.start_time > since)
        .collect();
    top_n(recent, n, |a, b| by_distance_desc(a, b))
        .into_iter()
        .map(FlightSummary::from)
        .collect()
}

/// Takeoffs by flight count. Flights without a takeoff are skipped.
pub fn top_takeoffs(flights: &[FlightView], n: usize) -> Vec<TakeoffCount> {
    let mut groups: HashMap<TakeoffId, TakeoffCount> = HashMap::new();
    for flight in flights {
        let Some(takeoff) = &flight.takeoff else {
            continue;
        };
        groups
            .entry(takeoff.id)
            .or_insert_with(|| TakeoffCount {
                takeoff_id: takeoff.id,
                name: takeoff.name.clone(),
                flight_count: 0,
            })
            .flight_count += 1;
    }

    top_n(groups.into_values().collect(), n, |a, b| {
        b.flight_count
            .cmp(&a.flight_count)
            .then_with(|| a.takeoff_id.cmp(&b.takeoff_id))
    })
}

pub fn top_gliders(flights: &[FlightView], n: usize) -> Vec<GliderCount> {
    let mut groups: HashMap<GliderId, GliderCount> = HashMap::new();
    for flight in flights {
        groups
            .entry(flight.glider.id)
            .or_insert_with(|| GliderCount {
                glider_id: flight.glider.id,
                name: flight.glider.name.clone(),
                category: flight.glider.category,
                flight_count: 0,
            })
            .flight_count += 1;
    }

    top_n(groups.into_values().collect(), n, |a, b| {
        b.flight_count
            .cmp(&a.flight_count)
            .then_with(|| a.glider_id.cmp(&b.glider_id))
    })
}

/// Flight count per glider class, most used first.
pub fn category_breakdown(flights: &[FlightView]) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<GliderCategory, usize> = BTreeMap::new();
    for flight in flights {
        *counts.entry(flight.glider.category).or_default() += 1;
    }

    let mut breakdown: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, flight_count)| CategoryCount {
            category,
            flight_count,
        })
        .collect();
    breakdown.sort_by(|a, b| {
        b.flight_count
            .cmp(&a.flight_count)
            .then_with(|| a.category.cmp(&b.category))
    });
    breakdown
}

/// Pilots by accumulated distance.
pub fn top_pilots(flights: &[FlightView], n: usize) -> Vec<PilotTotal> {
    let mut groups: HashMap<PilotId, PilotTotal> = HashMap::new();
    for flight in flights {
        let entry = groups.entry(flight.pilot.id).or_insert_with(|| PilotTotal {
            pilot_id: flight.pilot.id,
            name: flight.pilot.name.clone(),
            username: flight.pilot.username.clone(),
            flight_count: 0,
            total_km: 0.0,
        });
        entry.flight_count += 1;
        entry.total_km += flight.distance_km;
    }

    top_n(groups.into_values().collect(), n, |a, b| {
        b.total_km
            .total_cmp(&a.total_km)
            .then_with(|| a.pilot_id.cmp(&b.pilot_id))
    })
    .into_iter()
    .map(|mut p| {
        p.total_km = round_to(p.total_km, 0);
        p
    })
    .collect()
}

/// Days with the most distinct pilots; more flights, then the earlier day, win ties.
pub fn busiest_days(flights: &[FlightView], n: usize) -> Vec<DayActivity> {
    let mut days: BTreeMap<NaiveDate, (HashSet<PilotId>, usize, f64)> = BTreeMap::new();
    for flight in flights {
        let (pilots, count, longest) = days
            .entry(flight.day())
            .or_insert_with(|| (HashSet::new(), 0, f64::NEG_INFINITY));
        pilots.insert(flight.pilot.id);
        *count += 1;
        *longest = longest.max(flight.distance_km);
    }

    let activity = days
        .into_iter()
        .map(|(day, (pilots, flight_count, longest))| DayActivity {
            day,
            pilot_count: pilots.len(),
            flight_count,
            max_distance: round_to(longest, 1),
        })
        .collect();

    top_n(activity, n, |a, b| {
        b.pilot_count
            .cmp(&a.pilot_count)
            .then_with(|| b.flight_count.cmp(&a.flight_count))
            .then_with(|| a.day.cmp(&b.day))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FlightId, GeographicLocation};
    use crate::models::{Glider, Pilot, Takeoff};

    fn flight(id: i64, pilot: i64, takeoff: Option<i64>, day: u32, km: f64) -> FlightView {
        FlightView {
            id: FlightId::new(id),
            start_time: NaiveDate::from_ymd_opt(2023, 7, day)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            distance_km: km,
            score: km,
            airtime: 60,
            flight_type: "free flight".to_string(),
            url: String::new(),
            pilot: Pilot {
                id: PilotId::new(pilot),
                name: format!("Pilot {}", pilot),
                username: format!("p{}", pilot),
            },
            takeoff: takeoff.map(|id| Takeoff {
                id: TakeoffId::new(id),
                name: format!("Site {}", id),
                location: GeographicLocation::new(45.0, 25.0).unwrap(),
            }),
            glider: Glider {
                id: GliderId::new(if km > 100.0 { 2 } else { 1 }),
                name: if km > 100.0 { "Enzo" } else { "Sigma" }.to_string(),
                category: if km > 100.0 {
                    GliderCategory::D
                } else {
                    GliderCategory::B
                },
            },
        }
    }

    #[test]
    fn test_top_flights_ties_break_on_lowest_id() {
        let flights = vec![
            flight(3, 1, None, 1, 50.0),
            flight(1, 1, None, 1, 50.0),
            flight(2, 1, None, 1, 120.0),
        ];
        let ids: Vec<_> = top_flights(&flights, 2).iter().map(|f| f.id.value()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_top_takeoffs_skip_flights_without_site() {
        let flights = vec![
            flight(1, 1, Some(2), 1, 10.0),
            flight(2, 1, Some(1), 1, 10.0),
            flight(3, 2, Some(2), 2, 10.0),
            flight(4, 2, None, 2, 10.0),
        ];
        let top = top_takeoffs(&flights, 5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].takeoff_id, TakeoffId::new(2));
        assert_eq!(top[0].flight_count, 2);
    }

    #[test]
    fn test_category_breakdown_most_used_first() {
        let flights = vec![
            flight(1, 1, None, 1, 150.0),
            flight(2, 1, None, 1, 10.0),
            flight(3, 1, None, 1, 20.0),
        ];
        let breakdown = category_breakdown(&flights);
        assert_eq!(breakdown[0].category, GliderCategory::B);
        assert_eq!(breakdown[0].flight_count, 2);
        assert_eq!(breakdown[1].category, GliderCategory::D);
    }

    #[test]
    fn test_top_pilots_round_totals() {
        let flights = vec![
            flight(1, 1, None, 1, 10.4),
            flight(2, 1, None, 2, 10.4),
            flight(3, 2, None, 1, 150.0),
        ];
        let top = top_pilots(&flights, 5);
        assert_eq!(top[0].pilot_id, PilotId::new(2));
        assert_eq!(top[1].total_km, 21.0);
        assert_eq!(top[1].flight_count, 2);
    }

    #[test]
    fn test_busiest_days_by_distinct_pilots() {
        let flights = vec![
            flight(1, 1, None, 1, 10.0),
            flight(2, 1, None, 1, 12.0),
            flight(3, 1, None, 1, 14.0),
            flight(4, 1, None, 2, 10.0),
            flight(5, 2, None, 2, 30.0),
        ];
        let days = busiest_days(&flights, 5);
        assert_eq!(days[0].day, NaiveDate::from_ymd_opt(2023, 7, 2).unwrap());
        assert_eq!(days[0].pilot_count, 2);
        assert_eq!(days[0].max_distance, 30.0);
        assert_eq!(days[1].flight_count, 3);
    }

    #[test]
    fn test_recent_notable_window() {
        let flights = vec![
            flight(1, 1, None, 1, 60.0),
            flight(2, 1, None, 20, 60.0),
            flight(3, 1, None, 21, 40.0),
        ];
        let now = NaiveDate::from_ymd_opt(2023, 7, 31)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let recent = recent_notable_flights(&flights, now, 20);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, FlightId::new(2));
    }
}
