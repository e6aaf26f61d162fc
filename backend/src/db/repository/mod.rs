//! Repository traits for the flight-log store.
//!
//! The store is split into two concerns:
//! - [`FlightRepository`]: liveness plus scans of the primary (paraglider) view
//! - [`DirectoryRepository`]: lookups and listings of pilots, takeoffs and gliders
//!
//! [`FullRepository`] combines both and is what the service layer consumes.

pub mod error;

use async_trait::async_trait;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use crate::api::{GliderId, TakeoffId};
use crate::models::{FlightScope, FlightView, Glider, Pilot, Takeoff};

/// Read access to flights.
///
/// Every method applies the hang-glider exclusion before anything else:
/// flights on HG/RHG wings are never returned.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    /// No-op read against the store.
    ///
    /// `Ok(true)` means reachable, including when the dataset is empty.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// All primary-view flights in `scope`, joined with their entities,
    /// in ascending id order.
    async fn scan_flights(&self, scope: FlightScope) -> RepositoryResult<Vec<FlightView>>;
}

/// Read access to the entity directory. Listings are not filtered by category.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    async fn get_pilot_by_username(&self, username: &str) -> RepositoryResult<Option<Pilot>>;

    async fn get_takeoff(&self, id: TakeoffId) -> RepositoryResult<Option<Takeoff>>;

    async fn get_glider(&self, id: GliderId) -> RepositoryResult<Option<Glider>>;

    async fn list_pilots(&self) -> RepositoryResult<Vec<Pilot>>;

    async fn list_takeoffs(&self) -> RepositoryResult<Vec<Takeoff>>;

    async fn list_gliders(&self) -> RepositoryResult<Vec<Glider>>;

    async fn count_pilots(&self) -> RepositoryResult<usize>;
}

/// Everything the service layer needs from a store.
pub trait FullRepository: FlightRepository + DirectoryRepository {}

impl<T> FullRepository for T where T: FlightRepository + DirectoryRepository {}
