//! # xcstats
//!
//! Analytics engine for a regional cross-country paragliding flight log.
//!
//! The crate answers a fixed set of read-only queries over flights, pilots,
//! launch sites and gliders: filtered and paginated flight listings, calendar
//! and time-of-day aggregates, distance histograms, leaderboards, records
//! and per-site, per-pilot and per-wing rollups. Hang-glider flights stay in
//! the directory but are excluded from every statistic.
//!
//! ## Architecture
//!
//! - [`models`]: domain entities and the joined [`models::FlightView`] row
//! - [`api`]: identifiers and the serializable response types
//! - [`services`]: pure computation engines over scans of flight rows
//! - [`db`]: repository traits, the in-memory and Postgres backends, and the
//!   async service layer that wires the two together
//! - [`http`]: axum router exposing the service layer as JSON
//! - [`routes`]: response types grouped by endpoint, plus their paths

// RepositoryError carries a structured context.
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
