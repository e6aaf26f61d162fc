//! Repository implementations module.
//!
//! Backends implementing `FlightRepository` and `DirectoryRepository`:
//! - `postgres`: PostgreSQL implementation with Diesel ORM
//! - `local`: In-memory store seeded from a JSON dataset
pub mod local;
#[cfg(feature = "postgres-repo")]
pub mod postgres;

pub use local::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use postgres::{PoolStats, PostgresConfig, PostgresRepository};
