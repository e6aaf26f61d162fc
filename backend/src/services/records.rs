//! Best-per-partition records and global superlatives.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;

use crate::api::{
    AllTimeRecords, AnnualRecord, BusiestDay, CategoryRecord, EpicDay, FlightSummary, FunStats,
    PilotId, PilotSuperlative, RecordsOverview, SiteRecord,
};
use crate::models::{FlightView, Pilot};

/// Flights longer than this make a day "epic".
pub const EPIC_DISTANCE_KM: f64 = 300.0;
/// Airtime above this (minutes) is treated as a bad track for the airtime record.
pub const MAX_PLAUSIBLE_AIRTIME_MIN: u32 = 600;

/// Whether `candidate` beats `current` on `metric`, lower id winning ties.
fn beats<M>(candidate: &FlightView, current: &FlightView, metric: &M) -> bool
where
    M: Fn(&FlightView) -> f64,
{
    match metric(candidate).total_cmp(&metric(current)) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Equal => candidate.id < current.id,
        std::cmp::Ordering::Less => false,
    }
}

/// Longest flight per partition key, in one pass.
///
/// Flights for which `key` returns `None` belong to no partition.
pub fn best_per_partition<'a, K, F>(flights: &'a [FlightView], key: F) -> BTreeMap<K, &'a FlightView>
where
    K: Ord,
    F: Fn(&FlightView) -> Option<K>,
{
    let distance = |f: &FlightView| f.distance_km;
    let mut best: BTreeMap<K, &FlightView> = BTreeMap::new();
    for flight in flights {
        let Some(k) = key(flight) else {
            continue;
        };
        match best.entry(k) {
            Entry::Occupied(mut current) => {
                if beats(flight, current.get(), &distance) {
                    current.insert(flight);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(flight);
            }
        }
    }
    best
}

fn arg_max<'a, M>(flights: impl Iterator<Item = &'a FlightView>, metric: M) -> Option<&'a FlightView>
where
    M: Fn(&FlightView) -> f64,
{
    flights.fold(None, |best, flight| match best {
        Some(current) if !beats(flight, current, &metric) => Some(current),
        _ => Some(flight),
    })
}

pub fn all_time_records(flights: &[FlightView]) -> AllTimeRecords {
    AllTimeRecords {
        longest: arg_max(flights.iter(), |f| f.distance_km).map(FlightSummary::from),
        highest_score: arg_max(flights.iter(), |f| f.score).map(FlightSummary::from),
        longest_airtime: arg_max(
            flights
                .iter()
                .filter(|f| f.airtime <= MAX_PLAUSIBLE_AIRTIME_MIN),
            |f| f64::from(f.airtime),
        )
        .map(FlightSummary::from),
    }
}

pub fn category_records(flights: &[FlightView]) -> Vec<CategoryRecord> {
    best_per_partition(flights, |f| Some(f.glider.category))
        .into_iter()
        .map(|(category, flight)| CategoryRecord {
            category,
            flight: FlightSummary::from(flight),
        })
        .collect()
}

pub fn annual_records(flights: &[FlightView]) -> Vec<AnnualRecord> {
    best_per_partition(flights, |f| Some(f.year()))
        .into_iter()
        .map(|(year, flight)| AnnualRecord {
            year,
            flight: FlightSummary::from(flight),
        })
        .collect()
}

pub fn site_records(flights: &[FlightView]) -> Vec<SiteRecord> {
    best_per_partition(flights, |f| f.takeoff_id())
        .into_iter()
        .map(|(takeoff_id, flight)| SiteRecord {
            takeoff_id,
            takeoff_name: flight
                .takeoff
                .as_ref()
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            flight: FlightSummary::from(flight),
        })
        .collect()
}

/// Day with the most distinct pilots flying at least [`EPIC_DISTANCE_KM`].
///
/// Ties go to the day with more flights, then to the earlier day.
pub fn epic_day(flights: &[FlightView]) -> Option<EpicDay> {
    #[derive(Default)]
    struct Day {
        pilots: HashSet<PilotId>,
        epic_pilots: HashSet<PilotId>,
        flights: usize,
    }

    let mut days: BTreeMap<NaiveDate, Day> = BTreeMap::new();
    for flight in flights {
        let day = days.entry(flight.day()).or_default();
        day.flights += 1;
        day.pilots.insert(flight.pilot.id);
        if flight.distance_km >= EPIC_DISTANCE_KM {
            day.epic_pilots.insert(flight.pilot.id);
        }
    }

    days.into_iter()
        .filter(|(_, d)| !d.epic_pilots.is_empty())
        .map(|(day, d)| EpicDay {
            day,
            pilots_300k: d.epic_pilots.len(),
            pilot_count: d.pilots.len(),
            flight_count: d.flights,
        })
        // Iteration is day-ascending, so keeping the first maximum keeps the earliest day.
        .fold(None, |best: Option<EpicDay>, candidate| match best {
            Some(current)
                if (current.pilots_300k, current.flight_count)
                    >= (candidate.pilots_300k, candidate.flight_count) =>
            {
                Some(current)
            }
            _ => Some(candidate),
        })
}

/// Day with the most flights; earliest day wins ties.
pub fn busiest_day(flights: &[FlightView]) -> Option<BusiestDay> {
    let mut days: BTreeMap<NaiveDate, (usize, HashSet<PilotId>)> = BTreeMap::new();
    for flight in flights {
        let (count, pilots) = days.entry(flight.day()).or_default();
        *count += 1;
        pilots.insert(flight.pilot.id);
    }

    days.into_iter()
        .map(|(day, (flight_count, pilots))| BusiestDay {
            day,
            flight_count,
            pilot_count: pilots.len(),
        })
        .fold(None, |best: Option<BusiestDay>, candidate| match best {
            Some(current) if current.flight_count >= candidate.flight_count => Some(current),
            _ => Some(candidate),
        })
}

/// Pilot maximizing the number of distinct values of `key`; lowest pilot id wins ties.
fn pilot_superlative<K, F>(flights: &[FlightView], key: F) -> Option<PilotSuperlative>
where
    K: Eq + std::hash::Hash,
    F: Fn(&FlightView) -> Option<K>,
{
    let mut groups: HashMap<PilotId, (&Pilot, HashSet<K>)> = HashMap::new();
    for flight in flights {
        let (_, values) = groups
            .entry(flight.pilot.id)
            .or_insert_with(|| (&flight.pilot, HashSet::new()));
        if let Some(value) = key(flight) {
            values.insert(value);
        }
    }

    groups
        .into_values()
        .map(|(pilot, values)| (pilot, values.len()))
        .max_by(|(a, a_count), (b, b_count)| a_count.cmp(b_count).then_with(|| b.id.cmp(&a.id)))
        .map(|(pilot, value)| PilotSuperlative {
            pilot_id: pilot.id,
            name: pilot.name.clone(),
            username: pilot.username.clone(),
            value,
        })
}

/// Pilot who launched from the most distinct takeoffs.
pub fn most_sites_pilot(flights: &[FlightView]) -> Option<PilotSuperlative> {
    pilot_superlative(flights, |f| f.takeoff_id())
}

/// Pilot who flew in the most distinct calendar years.
pub fn most_consistent_pilot(flights: &[FlightView]) -> Option<PilotSuperlative> {
    pilot_superlative(flights, |f| Some(f.year()))
}

pub fn fun_stats(flights: &[FlightView]) -> FunStats {
    FunStats {
        epic_day: epic_day(flights),
        busiest_day: busiest_day(flights),
        most_sites_pilot: most_sites_pilot(flights),
        most_consistent_pilot: most_consistent_pilot(flights),
    }
}

pub fn records_overview(flights: &[FlightView]) -> RecordsOverview {
    RecordsOverview {
        all_time: all_time_records(flights),
        by_category: category_records(flights),
        by_year: annual_records(flights),
        by_takeoff: site_records(flights),
        fun: fun_stats(flights),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FlightId, GeographicLocation, GliderId, TakeoffId};
    use crate::models::{Glider, GliderCategory, Takeoff};

    fn flight(id: i64, pilot: i64, takeoff: Option<i64>, ymd: (i32, u32, u32), km: f64) -> FlightView {
        FlightView {
            id: FlightId::new(id),
            start_time: NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            distance_km: km,
            score: km * 0.8,
            airtime: (km * 2.0) as u32,
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
                id: GliderId::new(1),
                name: "Sigma".to_string(),
                category: GliderCategory::B,
            },
        }
    }

    #[test]
    fn test_best_per_partition_ties_go_to_lowest_id() {
        let flights = vec![
            flight(5, 1, Some(1), (2023, 7, 1), 100.0),
            flight(2, 2, Some(1), (2023, 7, 2), 100.0),
            flight(9, 2, Some(2), (2023, 7, 2), 10.0),
            flight(3, 2, None, (2023, 7, 2), 500.0),
        ];
        let best = best_per_partition(&flights, |f| f.takeoff_id());
        assert_eq!(best.len(), 2);
        assert_eq!(best[&TakeoffId::new(1)].id, FlightId::new(2));
        assert_eq!(best[&TakeoffId::new(2)].id, FlightId::new(9));
    }

    #[test]
    fn test_all_time_airtime_ignores_implausible_tracks() {
        let flights = vec![
            flight(1, 1, None, (2023, 7, 1), 400.0), // 800 min
            flight(2, 1, None, (2023, 7, 2), 250.0), // 500 min
        ];
        let records = all_time_records(&flights);
        assert_eq!(records.longest.unwrap().id, FlightId::new(1));
        assert_eq!(records.highest_score.unwrap().id, FlightId::new(1));
        assert_eq!(records.longest_airtime.unwrap().id, FlightId::new(2));
    }

    #[test]
    fn test_empty_dataset_has_no_superlatives() {
        assert_eq!(fun_stats(&[]), FunStats::default());
        assert_eq!(all_time_records(&[]), AllTimeRecords::default());
    }

    #[test]
    fn test_epic_day_requires_a_300k_pilot() {
        let flights = vec![flight(1, 1, None, (2023, 7, 1), 299.9)];
        assert!(epic_day(&flights).is_none());
    }

    #[test]
    fn test_epic_day_tie_breaks() {
        let flights = vec![
            flight(1, 1, None, (2023, 7, 3), 300.0),
            flight(2, 2, None, (2023, 7, 1), 310.0),
            flight(3, 3, None, (2023, 7, 1), 20.0),
            flight(4, 4, None, (2023, 7, 2), 305.0),
            flight(5, 5, None, (2023, 7, 2), 15.0),
        ];
        let day = epic_day(&flights).unwrap();
        assert_eq!(day.day, NaiveDate::from_ymd_opt(2023, 7, 1).unwrap());
        assert_eq!(day.pilots_300k, 1);
        assert_eq!(day.flight_count, 2);
    }

    #[test]
    fn test_busiest_day_earliest_wins_tie() {
        let flights = vec![
            flight(1, 1, None, (2023, 7, 2), 10.0),
            flight(2, 1, None, (2023, 7, 1), 10.0),
        ];
        let day = busiest_day(&flights).unwrap();
        assert_eq!(day.day, NaiveDate::from_ymd_opt(2023, 7, 1).unwrap());
    }

    #[test]
    fn test_pilot_superlatives() {
        let flights = vec![
            flight(1, 2, Some(1), (2021, 7, 1), 10.0),
            flight(2, 2, Some(2), (2022, 7, 1), 10.0),
            flight(3, 1, Some(1), (2021, 7, 1), 10.0),
            flight(4, 1, Some(2), (2022, 7, 1), 10.0),
            flight(5, 1, None, (2023, 7, 1), 10.0),
        ];
        let sites = most_sites_pilot(&flights).unwrap();
        assert_eq!(sites.pilot_id, PilotId::new(1));
        assert_eq!(sites.value, 2);

        let years = most_consistent_pilot(&flights).unwrap();
        assert_eq!(years.pilot_id, PilotId::new(1));
        assert_eq!(years.value, 3);
    }
}
