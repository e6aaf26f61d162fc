//! In-memory repository.
//!
//! Holds a validated [`Dataset`] behind a read-write lock. Scans clone the
//! matching rows out so no lock is held across an await point. Used for tests,
//! local development and serving a JSON dataset file without a database.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::api::{GliderId, PilotId, TakeoffId};
use crate::db::repository::{
    DirectoryRepository, ErrorContext, FlightRepository, RepositoryError, RepositoryResult,
};
use crate::models::{Flight, FlightScope, FlightView, Glider, Pilot, Takeoff};

/// Serializable flight log: the four tables, flat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub pilots: Vec<Pilot>,
    #[serde(default)]
    pub takeoffs: Vec<Takeoff>,
    #[serde(default)]
    pub gliders: Vec<Glider>,
    #[serde(default)]
    pub flights: Vec<Flight>,
}

impl Dataset {
    /// Check identity, reference and value invariants.
    pub fn validate(&self) -> RepositoryResult<()> {
        let invalid = |entity: &str, id: String, message: String| {
            RepositoryError::validation_with_context(
                message,
                ErrorContext::new("validate_dataset")
                    .with_entity(entity)
                    .with_entity_id(id),
            )
        };

        let mut pilot_ids = HashSet::new();
        let mut usernames = HashSet::new();
        for pilot in &self.pilots {
            if !pilot_ids.insert(pilot.id) {
                return Err(invalid("pilot", pilot.id.to_string(), "Duplicate pilot id".into()));
            }
            if !usernames.insert(pilot.username.as_str()) {
                return Err(invalid(
                    "pilot",
                    pilot.id.to_string(),
                    format!("Duplicate username '{}'", pilot.username),
                ));
            }
        }

        let mut takeoff_ids = HashSet::new();
        for takeoff in &self.takeoffs {
            if !takeoff_ids.insert(takeoff.id) {
                return Err(invalid("takeoff", takeoff.id.to_string(), "Duplicate takeoff id".into()));
            }
            takeoff
                .location
                .validate()
                .map_err(|e| invalid("takeoff", takeoff.id.to_string(), e))?;
        }

        let mut glider_ids = HashSet::new();
        let mut glider_names = HashSet::new();
        for glider in &self.gliders {
            if !glider_ids.insert(glider.id) {
                return Err(invalid("glider", glider.id.to_string(), "Duplicate glider id".into()));
            }
            if !glider_names.insert(glider.name.as_str()) {
                return Err(invalid(
                    "glider",
                    glider.id.to_string(),
                    format!("Duplicate glider name '{}'", glider.name),
                ));
            }
        }

        let mut flight_ids = HashSet::new();
        for flight in &self.flights {
            let id = flight.id.to_string();
            if !flight_ids.insert(flight.id) {
                return Err(invalid("flight", id, "Duplicate flight id".into()));
            }
            flight.validate().map_err(|e| invalid("flight", id.clone(), e))?;
            if !pilot_ids.contains(&flight.pilot_id) {
                return Err(invalid("flight", id, format!("Unknown pilot {}", flight.pilot_id)));
            }
            if !glider_ids.contains(&flight.glider_id) {
                return Err(invalid("flight", id, format!("Unknown glider {}", flight.glider_id)));
            }
            if let Some(takeoff_id) = flight.takeoff_id {
                if !takeoff_ids.contains(&takeoff_id) {
                    return Err(invalid("flight", id, format!("Unknown takeoff {}", takeoff_id)));
                }
            }
        }

        Ok(())
    }
}

/// Dataset indexed by id.
#[derive(Debug, Default)]
struct Store {
    pilots: BTreeMap<PilotId, Pilot>,
    takeoffs: BTreeMap<TakeoffId, Takeoff>,
    gliders: BTreeMap<GliderId, Glider>,
    /// Sorted by id.
    flights: Vec<Flight>,
}

impl From<Dataset> for Store {
    fn from(dataset: Dataset) -> Self {
        let mut flights = dataset.flights;
        flights.sort_by_key(|f| f.id);
        Self {
            pilots: dataset.pilots.into_iter().map(|p| (p.id, p)).collect(),
            takeoffs: dataset.takeoffs.into_iter().map(|t| (t.id, t)).collect(),
            gliders: dataset.gliders.into_iter().map(|g| (g.id, g)).collect(),
            flights,
        }
    }
}

impl Store {
    /// Join a flight with its entities; `Ok(None)` when it is outside the primary view.
    fn view(&self, flight: &Flight) -> RepositoryResult<Option<FlightView>> {
        let missing = |entity: &str| {
            RepositoryError::internal_with_context(
                format!("Flight {} references a missing {}", flight.id, entity),
                ErrorContext::new("scan_flights").with_entity(entity),
            )
        };

        let glider = self.gliders.get(&flight.glider_id).ok_or_else(|| missing("glider"))?;
        if !glider.category.is_paraglider() {
            return Ok(None);
        }
        let pilot = self.pilots.get(&flight.pilot_id).ok_or_else(|| missing("pilot"))?;
        let takeoff = match flight.takeoff_id {
            Some(id) => Some(self.takeoffs.get(&id).ok_or_else(|| missing("takeoff"))?),
            None => None,
        };
        Ok(Some(FlightView::join(flight, pilot, takeoff, glider)))
    }
}

/// In-memory flight-log repository.
#[derive(Debug, Default)]
pub struct LocalRepository {
    store: RwLock<Store>,
}

impl LocalRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository over a dataset, rejecting it if any invariant fails.
    pub fn with_dataset(dataset: Dataset) -> RepositoryResult<Self> {
        dataset.validate()?;
        log::info!(
            "Loaded local dataset: {} flights, {} pilots, {} takeoffs, {} gliders",
            dataset.flights.len(),
            dataset.pilots.len(),
            dataset.takeoffs.len(),
            dataset.gliders.len()
        );
        Ok(Self {
            store: RwLock::new(Store::from(dataset)),
        })
    }

    /// Load a JSON dataset file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let context = || ErrorContext::new("load_dataset").with_details(path.display().to_string());
        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::ConfigurationError {
                message: format!("Failed to read dataset file: {}", e),
                context: context(),
            }
        })?;
        let dataset: Dataset = serde_json::from_str(&content).map_err(|e| {
            RepositoryError::validation_with_context(
                format!("Failed to parse dataset file: {}", e),
                context(),
            )
        })?;
        Self::with_dataset(dataset)
    }
}

#[async_trait]
impl FlightRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let _guard = self.store.read();
        Ok(true)
    }

    async fn scan_flights(&self, scope: FlightScope) -> RepositoryResult<Vec<FlightView>> {
        let store = self.store.read();
        let mut views = Vec::new();
        for flight in store.flights.iter().filter(|f| scope.admits(f)) {
            if let Some(view) = store.view(flight)? {
                views.push(view);
            }
        }
        log::debug!("Scanned {} flights for scope {}", views.len(), scope);
        Ok(views)
    }
}

#[async_trait]
impl DirectoryRepository for LocalRepository {
    async fn get_pilot_by_username(&self, username: &str) -> RepositoryResult<Option<Pilot>> {
        let store = self.store.read();
        Ok(store
            .pilots
            .values()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn get_takeoff(&self, id: TakeoffId) -> RepositoryResult<Option<Takeoff>> {
        Ok(self.store.read().takeoffs.get(&id).cloned())
    }

    async fn get_glider(&self, id: GliderId) -> RepositoryResult<Option<Glider>> {
        Ok(self.store.read().gliders.get(&id).cloned())
    }

    async fn list_pilots(&self) -> RepositoryResult<Vec<Pilot>> {
        Ok(self.store.read().pilots.values().cloned().collect())
    }

    async fn list_takeoffs(&self) -> RepositoryResult<Vec<Takeoff>> {
        Ok(self.store.read().takeoffs.values().cloned().collect())
    }

    async fn list_gliders(&self) -> RepositoryResult<Vec<Glider>> {
        Ok(self.store.read().gliders.values().cloned().collect())
    }

    async fn count_pilots(&self) -> RepositoryResult<usize> {
        Ok(self.store.read().pilots.len())
    }
}
