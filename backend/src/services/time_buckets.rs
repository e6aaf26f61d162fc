//! Time-bucketed activity series.
//!
//! Sparse series (heatmap, yearly) only contain populated buckets. Fixed
//! domains (months, hours, weekdays) are materialized in full and the grouped
//! counts overlaid on top, so their length never depends on the data.

use std::collections::{BTreeMap, HashSet};

use super::numeric::{mean, round1, round_to};
use crate::api::{HeatmapCell, HourlyBucket, MonthCount, MonthlyStat, WeekdayBucket, YearlyStat};
use crate::models::FlightView;

/// Only flights longer than this count towards the hour-of-day series.
pub const HOURLY_MIN_DISTANCE_KM: f64 = 20.0;

pub fn calendar_heatmap(flights: &[FlightView]) -> Vec<HeatmapCell> {
    let mut cells: BTreeMap<(i32, u32), (usize, f64)> = BTreeMap::new();
    for flight in flights {
        let cell = cells.entry((flight.year(), flight.month())).or_default();
        cell.0 += 1;
        cell.1 += flight.score;
    }

    cells
        .into_iter()
        .map(|((year, month), (count, score_sum))| HeatmapCell {
            year,
            month,
            flight_count: count,
            avg_score: round1(score_sum / count as f64),
        })
        .collect()
}

/// Twelve entries, January first. Empty months have no average.
pub fn monthly_stats(flights: &[FlightView]) -> Vec<MonthlyStat> {
    let mut distances: [Vec<f64>; 12] = Default::default();
    for flight in flights {
        distances[(flight.month() - 1) as usize].push(flight.distance_km);
    }

    distances
        .iter()
        .enumerate()
        .map(|(idx, month)| MonthlyStat {
            month: idx as u32 + 1,
            flight_count: month.len(),
            avg_distance: mean(month.iter().copied()).map(round1),
        })
        .collect()
}

/// Twelve-entry flight count series, January first.
pub fn month_counts<'a, I>(flights: I) -> Vec<MonthCount>
where
    I: IntoIterator<Item = &'a FlightView>,
{
    let mut counts = [0usize; 12];
    for flight in flights {
        counts[(flight.month() - 1) as usize] += 1;
    }
    counts
        .iter()
        .enumerate()
        .map(|(idx, count)| MonthCount {
            month: idx as u32 + 1,
            count: *count,
        })
        .collect()
}

/// Twenty-four entries; only cross-country flights are counted.
pub fn hourly_distribution(flights: &[FlightView]) -> Vec<HourlyBucket> {
    let mut counts = [0usize; 24];
    for flight in flights.iter().filter(|f| f.distance_km > HOURLY_MIN_DISTANCE_KM) {
        counts[flight.hour() as usize] += 1;
    }
    counts
        .iter()
        .enumerate()
        .map(|(hour, count)| HourlyBucket {
            hour: hour as u32,
            flight_count: *count,
        })
        .collect()
}

/// Seven entries, Sunday first.
pub fn weekday_distribution(flights: &[FlightView]) -> Vec<WeekdayBucket> {
    let mut counts = [0usize; 7];
    for flight in flights {
        counts[flight.weekday() as usize] += 1;
    }
    counts
        .iter()
        .enumerate()
        .map(|(weekday, count)| WeekdayBucket {
            weekday: weekday as u32,
            flight_count: *count,
        })
        .collect()
}

pub fn yearly_stats(flights: &[FlightView]) -> Vec<YearlyStat> {
    let mut years: BTreeMap<i32, Vec<&FlightView>> = BTreeMap::new();
    for flight in flights {
        years.entry(flight.year()).or_default().push(flight);
    }

    years
        .into_iter()
        .map(|(year, group)| {
            let total: f64 = group.iter().map(|f| f.distance_km).sum();
            let pilots: HashSet<_> = group.iter().map(|f| f.pilot.id).collect();
            YearlyStat {
                year,
                flight_count: group.len(),
                total_km: round_to(total, 0),
                avg_distance: round1(total / group.len() as f64),
                max_distance: group
                    .iter()
                    .map(|f| f.distance_km)
                    .fold(f64::NEG_INFINITY, f64::max),
                pilot_count: pilots.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FlightId, GliderId, PilotId};
    use crate::models::{Glider, GliderCategory, Pilot};
    use chrono::NaiveDate;

    fn flight(id: i64, pilot: i64, ymd: (i32, u32, u32), hour: u32, km: f64, score: f64) -> FlightView {
        FlightView {
            id: FlightId::new(id),
            start_time: NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            distance_km: km,
            score,
            airtime: 60,
            flight_type: "free flight".to_string(),
            url: String::new(),
            pilot: Pilot {
                id: PilotId::new(pilot),
                name: format!("Pilot {}", pilot),
                username: format!("p{}", pilot),
            },
            takeoff: None,
            glider: Glider {
                id: GliderId::new(1),
                name: "Glider".to_string(),
                category: GliderCategory::B,
            },
        }
    }

    fn sample() -> Vec<FlightView> {
        vec![
            flight(1, 1, (2023, 7, 15), 10, 120.0, 100.0),
            flight(2, 1, (2023, 7, 16), 11, 80.5, 70.0),
            flight(3, 2, (2023, 8, 1), 9, 3.2, 2.0),
            flight(4, 2, (2022, 6, 10), 14, 250.0, 200.0),
        ]
    }

    #[test]
    fn test_heatmap_is_sparse_and_ordered() {
        let cells = calendar_heatmap(&sample());
        let keys: Vec<_> = cells.iter().map(|c| (c.year, c.month)).collect();
        assert_eq!(keys, vec![(2022, 6), (2023, 7), (2023, 8)]);
        assert_eq!(cells[1].flight_count, 2);
        assert_eq!(cells[1].avg_score, 85.0);
    }

    #[test]
    fn test_monthly_stats_zero_fill() {
        let months = monthly_stats(&sample());
        assert_eq!(months.len(), 12);
        assert_eq!(months.iter().map(|m| m.flight_count).sum::<usize>(), 4);
        assert_eq!(months[0].avg_distance, None);
        // (120 + 80.5) / 2 = 100.25
        assert_eq!(months[6].avg_distance, Some(100.3));
    }

    #[test]
    fn test_hourly_counts_only_long_flights() {
        let hours = hourly_distribution(&sample());
        assert_eq!(hours.len(), 24);
        assert_eq!(hours[9].flight_count, 0);
        assert_eq!(hours[10].flight_count, 1);
        assert_eq!(hours.iter().map(|h| h.flight_count).sum::<usize>(), 3);
    }

    #[test]
    fn test_weekday_sunday_first() {
        let days = weekday_distribution(&sample());
        assert_eq!(days.len(), 7);
        // 2023-07-16 was a Sunday, 2023-07-15 a Saturday
        assert_eq!(days[0].flight_count, 1);
        assert_eq!(days[6].flight_count, 1);
        assert_eq!(days.iter().map(|d| d.flight_count).sum::<usize>(), 4);
    }

    #[test]
    fn test_empty_scope_still_materializes_fixed_domains() {
        assert_eq!(monthly_stats(&[]).len(), 12);
        assert_eq!(month_counts(&[]).len(), 12);
        assert_eq!(hourly_distribution(&[]).len(), 24);
        assert_eq!(weekday_distribution(&[]).len(), 7);
        assert!(calendar_heatmap(&[]).is_empty());
        assert!(yearly_stats(&[]).is_empty());
    }

    #[test]
    fn test_yearly_stats() {
        let years = yearly_stats(&sample());
        assert_eq!(years.len(), 2);
        let y2023 = &years[1];
        assert_eq!(y2023.year, 2023);
        assert_eq!(y2023.flight_count, 3);
        assert_eq!(y2023.total_km, 204.0);
        assert_eq!(y2023.avg_distance, 67.9);
        assert_eq!(y2023.max_distance, 120.0);
        assert_eq!(y2023.pilot_count, 2);
    }
}
