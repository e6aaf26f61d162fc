//! Fixed-boundary distance histogram.

use crate::api::HistogramBucket;
use crate::models::FlightView;

/// Bucket edges in km: `[lower, upper)`, the last bucket is open-ended.
const BUCKETS: [(&str, f64, Option<f64>); 6] = [
    ("0-1", 0.0, Some(1.0)),
    ("1-5", 1.0, Some(5.0)),
    ("5-20", 5.0, Some(20.0)),
    ("20-50", 20.0, Some(50.0)),
    ("50-100", 50.0, Some(100.0)),
    ("100+", 100.0, None),
];

/// Index of the bucket a distance falls into.
pub fn bucket_index(distance_km: f64) -> usize {
    BUCKETS
        .iter()
        .position(|(_, _, upper)| upper.is_some_and(|u| distance_km < u))
        .unwrap_or(BUCKETS.len() - 1)
}

/// All six buckets in ascending order, including empty ones.
pub fn distance_histogram(flights: &[FlightView]) -> Vec<HistogramBucket> {
    let mut counts = [0usize; BUCKETS.len()];
    for flight in flights {
        counts[bucket_index(flight.distance_km)] += 1;
    }

    BUCKETS
        .iter()
        .zip(counts)
        .map(|((label, lower, upper), count)| HistogramBucket {
            label: label.to_string(),
            lower_km: *lower,
            upper_km: *upper,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FlightId, GliderId, PilotId};
    use crate::models::{Glider, GliderCategory, Pilot};

    fn view(id: i64, km: f64) -> FlightView {
        FlightView {
            id: FlightId::new(id),
            start_time: chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            distance_km: km,
            score: km,
            airtime: 60,
            flight_type: "free flight".to_string(),
            url: String::new(),
            pilot: Pilot {
                id: PilotId::new(1),
                name: "Pilot".to_string(),
                username: "pilot".to_string(),
            },
            takeoff: None,
            glider: Glider {
                id: GliderId::new(1),
                name: "Wing".to_string(),
                category: GliderCategory::B,
            },
        }
    }

    #[test]
    fn test_bucket_edges_are_lower_inclusive() {
        assert_eq!(bucket_index(0.0), 0);
        assert_eq!(bucket_index(0.99), 0);
        assert_eq!(bucket_index(1.0), 1);
        assert_eq!(bucket_index(19.999), 2);
        assert_eq!(bucket_index(20.0), 3);
        assert_eq!(bucket_index(50.0), 4);
        assert_eq!(bucket_index(99.9), 4);
        assert_eq!(bucket_index(100.0), 5);
        assert_eq!(bucket_index(10_000.0), 5);
    }

    #[test]
    fn test_empty_histogram_has_all_buckets() {
        let buckets = distance_histogram(&[]);
        let labels: Vec<_> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["0-1", "1-5", "5-20", "20-50", "50-100", "100+"]);
        assert!(buckets.iter().all(|b| b.count == 0));
        assert_eq!(buckets[5].upper_km, None);
    }

    proptest::proptest! {
        #[test]
        fn prop_every_distance_lands_in_its_bucket(km in 0.0f64..2000.0) {
            let idx = bucket_index(km);
            let (_, lower, upper) = BUCKETS[idx];
            proptest::prop_assert!(km >= lower);
            proptest::prop_assert!(upper.map_or(true, |u| km < u));
        }

        #[test]
        fn prop_counts_sum_to_len(distances in proptest::collection::vec(0.0f64..1000.0, 0..200)) {
            let flights: Vec<FlightView> = distances
                .iter()
                .enumerate()
                .map(|(i, km)| view(i as i64, *km))
                .collect();
            let buckets = distance_histogram(&flights);
            proptest::prop_assert_eq!(buckets.len(), 6);
            proptest::prop_assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), flights.len());
        }
    }
}
