//! Per-site and per-wing summary rollups.
//!
//! Each rollup is built from two grouped passes over the scope: the ranked
//! top-ten subset of every group (for XC potential) and the whole group
//! population (everything else). The passes are joined by group key.

use std::collections::{HashMap, HashSet};

use super::numeric::{mean, percent, round1, round_to};
use super::rankings::{by_distance_desc, TOP_FLIGHTS_LIMIT};
use super::time_buckets::month_counts;
use crate::api::{AdoptionPoint, TakeoffSummary, WingSummary, YearlyStat};
use crate::models::{FlightView, Glider, Takeoff};

/// Flights at or above this distance count as "100k" flights.
pub const LONG_FLIGHT_KM: f64 = 100.0;

fn group_by<K, F>(flights: &[FlightView], key: F) -> HashMap<K, Vec<&FlightView>>
where
    K: Eq + std::hash::Hash,
    F: Fn(&FlightView) -> Option<K>,
{
    let mut groups: HashMap<K, Vec<&FlightView>> = HashMap::new();
    for flight in flights {
        if let Some(k) = key(flight) {
            groups.entry(k).or_default().push(flight);
        }
    }
    groups
}

/// Mean distance of the group's ten longest flights, one decimal.
pub fn xc_potential(group: &[&FlightView]) -> Option<f64> {
    let mut ranked = group.to_vec();
    ranked.sort_by(|a, b| by_distance_desc(a, b));
    mean(
        ranked
            .iter()
            .take(TOP_FLIGHTS_LIMIT)
            .map(|f| f.distance_km),
    )
    .map(round1)
}

/// Aggregates over a whole group population.
struct Population {
    flight_count: usize,
    pilot_count: usize,
    total_km: f64,
    max_distance: Option<f64>,
    last_flight: Option<chrono::NaiveDateTime>,
    weekend_pct: u32,
    flights_100k: usize,
    beginner_pct: u32,
}

impl Population {
    fn of(group: &[&FlightView]) -> Self {
        let pilots: HashSet<_> = group.iter().map(|f| f.pilot.id).collect();
        let weekend = group.iter().filter(|f| f.is_weekend()).count();
        let beginner = group
            .iter()
            .filter(|f| f.glider.category.is_beginner())
            .count();
        Self {
            flight_count: group.len(),
            pilot_count: pilots.len(),
            total_km: group.iter().map(|f| f.distance_km).sum(),
            max_distance: group.iter().map(|f| f.distance_km).reduce(f64::max),
            last_flight: group.iter().map(|f| f.start_time).max(),
            weekend_pct: percent(weekend, group.len()),
            flights_100k: group
                .iter()
                .filter(|f| f.distance_km >= LONG_FLIGHT_KM)
                .count(),
            beginner_pct: percent(beginner, group.len()),
        }
    }

    fn avg_distance(&self) -> Option<f64> {
        if self.flight_count == 0 {
            None
        } else {
            Some(round1(self.total_km / self.flight_count as f64))
        }
    }
}

/// Summary of one takeoff given the flights launched from it.
pub fn takeoff_summary(takeoff: &Takeoff, group: &[&FlightView]) -> TakeoffSummary {
    let population = Population::of(group);
    TakeoffSummary {
        id: takeoff.id,
        name: takeoff.name.clone(),
        latitude: takeoff.location.latitude,
        longitude: takeoff.location.longitude,
        flight_count: population.flight_count,
        pilot_count: population.pilot_count,
        record_km: population.max_distance,
        last_flight: population.last_flight,
        xc_potential: xc_potential(group),
        weekend_pct: population.weekend_pct,
        flights_100k: population.flights_100k,
        avg_distance: population.avg_distance(),
        beginner_pct: population.beginner_pct,
        monthly: month_counts(group.iter().copied()),
    }
}

/// Every takeoff in the directory, busiest first. Sites without flights are
/// included with zero counts.
pub fn takeoff_summaries(takeoffs: &[Takeoff], flights: &[FlightView]) -> Vec<TakeoffSummary> {
    let groups = group_by(flights, |f| f.takeoff_id());
    let mut summaries: Vec<TakeoffSummary> = takeoffs
        .iter()
        .map(|takeoff| {
            let group = groups.get(&takeoff.id).map(Vec::as_slice).unwrap_or(&[]);
            takeoff_summary(takeoff, group)
        })
        .collect();

    summaries.sort_by(|a, b| b.flight_count.cmp(&a.flight_count).then_with(|| a.id.cmp(&b.id)));
    log::debug!("Rolled up {} takeoffs", summaries.len());
    summaries
}

/// Summary of one wing; `None` when it has no flights.
pub fn wing_summary(glider: &Glider, group: &[&FlightView]) -> Option<WingSummary> {
    let population = Population::of(group);
    let max_distance = population.max_distance?;
    let last_flight = population.last_flight?;
    let avg_distance = population.avg_distance()?;
    let xc = xc_potential(group)?;
    let years = group.iter().map(|f| f.year());
    let first_year = years.clone().min()?;
    let last_year = years.max()?;
    let speeds = group
        .iter()
        .filter(|f| f.airtime > 0)
        .map(|f| f.distance_km / (f64::from(f.airtime) / 60.0));

    Some(WingSummary {
        id: glider.id,
        name: glider.name.clone(),
        category: glider.category,
        flight_count: population.flight_count,
        pilot_count: population.pilot_count,
        total_km: round_to(population.total_km, 0),
        avg_distance,
        max_distance,
        avg_speed: mean(speeds).map(round1),
        first_year,
        last_year,
        last_flight,
        xc_potential: xc,
        weekend_pct: population.weekend_pct,
        flights_100k: population.flights_100k,
        monthly: month_counts(group.iter().copied()),
    })
}

/// Wings with at least one flight, most flown first.
pub fn wing_summaries(gliders: &[Glider], flights: &[FlightView]) -> Vec<WingSummary> {
    let groups = group_by(flights, |f| Some(f.glider.id));
    let mut summaries: Vec<WingSummary> = gliders
        .iter()
        .filter_map(|glider| {
            let group = groups.get(&glider.id)?;
            wing_summary(glider, group)
        })
        .collect();

    summaries.sort_by(|a, b| b.flight_count.cmp(&a.flight_count).then_with(|| a.id.cmp(&b.id)));
    log::debug!("Rolled up {} wings", summaries.len());
    summaries
}

/// Distinct pilots per year, from the yearly stats of a wing.
pub fn adoption_curve(yearly: &[YearlyStat]) -> Vec<AdoptionPoint> {
    yearly
        .iter()
        .map(|y| AdoptionPoint {
            year: y.year,
            pilot_count: y.pilot_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FlightId, GeographicLocation, GliderId, PilotId, TakeoffId};
    use crate::models::{GliderCategory, Pilot};
    use chrono::NaiveDate;

    fn site(id: i64) -> Takeoff {
        Takeoff {
            id: TakeoffId::new(id),
            name: format!("Site {}", id),
            location: GeographicLocation::new(45.0, 25.0).unwrap(),
        }
    }

    fn wing(id: i64, category: GliderCategory) -> Glider {
        Glider {
            id: GliderId::new(id),
            name: format!("Wing {}", id),
            category,
        }
    }

    fn flight(id: i64, pilot: i64, takeoff: i64, glider: &Glider, day: u32, km: f64, airtime: u32) -> FlightView {
        FlightView {
            id: FlightId::new(id),
            // July 2023: the 15th is a Saturday, the 16th a Sunday.
            start_time: NaiveDate::from_ymd_opt(2023, 7, day)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            distance_km: km,
            score: km,
            airtime,
            flight_type: "free flight".to_string(),
            url: String::new(),
            pilot: Pilot {
                id: PilotId::new(pilot),
                name: format!("Pilot {}", pilot),
                username: format!("p{}", pilot),
            },
            takeoff: Some(site(takeoff)),
            glider: glider.clone(),
        }
    }

    #[test]
    fn test_xc_potential_uses_top_ten_only() {
        let glider = wing(1, GliderCategory::B);
        let flights: Vec<FlightView> = (1..=12)
            .map(|i| flight(i, 1, 1, &glider, 3, i as f64 * 10.0, 60))
            .collect();
        let refs: Vec<&FlightView> = flights.iter().collect();
        // Top ten are 30..=120, mean 75
        assert_eq!(xc_potential(&refs), Some(75.0));
        assert_eq!(xc_potential(&[]), None);
    }

    #[test]
    fn test_takeoff_summaries_include_idle_sites() {
        let b = wing(1, GliderCategory::B);
        let d = wing(2, GliderCategory::D);
        let flights = vec![
            flight(1, 1, 2, &b, 15, 120.0, 300),
            flight(2, 2, 2, &d, 16, 40.0, 100),
            flight(3, 1, 2, &d, 17, 20.0, 60),
            flight(4, 1, 1, &b, 17, 5.0, 20),
        ];
        let summaries = takeoff_summaries(&[site(1), site(2), site(3)], &flights);
        let ids: Vec<_> = summaries.iter().map(|s| s.id.value()).collect();
        assert_eq!(ids, vec![2, 1, 3]);

        let busy = &summaries[0];
        assert_eq!(busy.flight_count, 3);
        assert_eq!(busy.pilot_count, 2);
        assert_eq!(busy.record_km, Some(120.0));
        assert_eq!(busy.flights_100k, 1);
        assert_eq!(busy.weekend_pct, 67);
        assert_eq!(busy.beginner_pct, 33);
        assert_eq!(busy.avg_distance, Some(60.0));
        assert_eq!(busy.monthly.len(), 12);
        assert_eq!(busy.monthly[6].count, 3);

        let idle = &summaries[2];
        assert_eq!(idle.flight_count, 0);
        assert_eq!(idle.record_km, None);
        assert_eq!(idle.xc_potential, None);
        assert_eq!(idle.weekend_pct, 0);
        assert_eq!(idle.monthly.iter().map(|m| m.count).sum::<usize>(), 0);
    }

    #[test]
    fn test_wing_summaries_skip_unflown_wings() {
        let b = wing(1, GliderCategory::B);
        let unused = wing(2, GliderCategory::C);
        let flights = vec![
            flight(1, 1, 1, &b, 15, 60.0, 120),
            flight(2, 2, 1, &b, 16, 30.0, 0),
        ];
        let summaries = wing_summaries(&[b.clone(), unused], &flights);
        assert_eq!(summaries.len(), 1);
        let w = &summaries[0];
        assert_eq!(w.total_km, 90.0);
        assert_eq!(w.avg_distance, 45.0);
        // Zero-airtime flights do not contribute to speed
        assert_eq!(w.avg_speed, Some(30.0));
        assert_eq!(w.first_year, 2023);
        assert_eq!(w.weekend_pct, 100);
        assert_eq!(w.xc_potential, 45.0);
    }
}
