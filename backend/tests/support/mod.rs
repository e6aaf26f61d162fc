#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};

use xcstats::api::{FlightId, GeographicLocation, GliderId, PilotId, TakeoffId};
use xcstats::db::{Dataset, FullRepository, LocalRepository};
use xcstats::models::{Flight, Glider, GliderCategory, Pilot, Takeoff};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Panic-safe (restores variables on unwind) and serialized, since env vars
/// are process-global and tests run in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub const BOB: i64 = 1;
pub const ANA: i64 = 2;
pub const RADU: i64 = 3;

pub const STICLARIA: i64 = 1;
pub const BUNLOC: i64 = 2;
pub const BRASOV_NORD: i64 = 3;

pub const RUSH_B: i64 = 1;
pub const SIGMA_C: i64 = 2;
pub const ZENO_D: i64 = 3;
pub const T2C_HG: i64 = 4;
pub const BOLERO_A: i64 = 5;

/// Reference instant for the time-windowed views.
pub fn now() -> NaiveDateTime {
    at(2024, 8, 1, 0, 0)
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn pilot(id: i64, name: &str, username: &str) -> Pilot {
    Pilot {
        id: PilotId::new(id),
        name: name.to_string(),
        username: username.to_string(),
    }
}

pub fn takeoff(id: i64, name: &str, latitude: f64, longitude: f64) -> Takeoff {
    Takeoff {
        id: TakeoffId::new(id),
        name: name.to_string(),
        location: GeographicLocation::new(latitude, longitude).unwrap(),
    }
}

pub fn glider(id: i64, name: &str, category: GliderCategory) -> Glider {
    Glider {
        id: GliderId::new(id),
        name: name.to_string(),
        category,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn flight(
    id: i64,
    pilot_id: i64,
    takeoff_id: Option<i64>,
    glider_id: i64,
    start_time: NaiveDateTime,
    distance_km: f64,
    score: f64,
    airtime: u32,
) -> Flight {
    Flight {
        id: FlightId::new(id),
        pilot_id: PilotId::new(pilot_id),
        takeoff_id: takeoff_id.map(TakeoffId::new),
        glider_id: GliderId::new(glider_id),
        start_time,
        distance_km,
        score,
        airtime,
        flight_type: "free flight".to_string(),
        url: format!("https://xc.example.org/flights/{}", id),
    }
}

/// Directory shared by every fixture dataset.
pub fn directory() -> Dataset {
    Dataset {
        pilots: vec![
            pilot(BOB, "Bob Popescu", "bob"),
            pilot(ANA, "Ana Ionescu", "ana"),
            pilot(RADU, "Radu Matei", "radu"),
        ],
        takeoffs: vec![
            takeoff(STICLARIA, "Sticlăria", 47.26, 26.65),
            takeoff(BUNLOC, "Bunloc", 45.59, 25.65),
            takeoff(BRASOV_NORD, "Brașov Nord", 45.68, 25.60),
        ],
        gliders: vec![
            glider(RUSH_B, "Ozone Rush 6", GliderCategory::B),
            glider(SIGMA_C, "Advance Sigma 11", GliderCategory::C),
            glider(ZENO_D, "Ozone Zeno 2", GliderCategory::D),
            glider(T2C_HG, "Wills Wing T2C", GliderCategory::Hg),
            glider(BOLERO_A, "Gin Bolero 7", GliderCategory::A),
        ],
        flights: Vec::new(),
    }
}

/// Seven paraglider flights (120, 80.5, 3.2, 250, 45, 310, 15 km) plus one
/// 400 km hang-glider flight that must never show up.
pub fn seed_dataset() -> Dataset {
    let mut dataset = directory();
    dataset.flights = vec![
        flight(101, BOB, Some(STICLARIA), RUSH_B, at(2023, 7, 15, 10, 0), 120.0, 150.0, 300),
        flight(102, BOB, Some(BUNLOC), RUSH_B, at(2023, 8, 2, 12, 30), 80.5, 95.2, 210),
        flight(103, BOB, Some(STICLARIA), SIGMA_C, at(2024, 5, 18, 11, 0), 3.2, 3.0, 20),
        flight(104, BOB, Some(STICLARIA), T2C_HG, at(2024, 7, 20, 9, 0), 400.0, 520.0, 560),
        flight(201, ANA, Some(STICLARIA), ZENO_D, at(2024, 6, 1, 9, 45), 250.0, 320.0, 480),
        flight(202, ANA, None, SIGMA_C, at(2024, 6, 10, 14, 0), 45.0, 50.0, 150),
        flight(301, RADU, Some(BUNLOC), ZENO_D, at(2024, 7, 20, 8, 30), 310.0, 400.0, 540),
        flight(302, RADU, Some(BUNLOC), BOLERO_A, at(2024, 7, 21, 13, 0), 15.0, 12.0, 60),
    ];
    dataset
}

/// Dataset with only the given distances, all flown by Bob from Sticlăria on a B wing.
pub fn distances_dataset(distances: &[f64]) -> Dataset {
    let mut dataset = directory();
    dataset.flights = distances
        .iter()
        .enumerate()
        .map(|(i, km)| {
            flight(
                1000 + i as i64,
                BOB,
                Some(STICLARIA),
                RUSH_B,
                at(2024, 6, 1 + (i as u32 % 28), 10, 0),
                *km,
                *km,
                60,
            )
        })
        .collect();
    dataset
}

pub fn repository(dataset: Dataset) -> Arc<dyn FullRepository> {
    Arc::new(LocalRepository::with_dataset(dataset).unwrap())
}

pub fn seeded_repository() -> Arc<dyn FullRepository> {
    repository(seed_dataset())
}
