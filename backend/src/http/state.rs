//! Application state for the HTTP server.

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};

use crate::db::repository::FullRepository;

/// Source of "now" for the time-windowed views.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn FullRepository>,
    pub clock: Clock,
}

impl AppState {
    /// Create a new application state reading the system clock in UTC.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            clock: Arc::new(|| Utc::now().naive_utc()),
        }
    }

    /// Pin "now" to a fixed instant.
    pub fn with_fixed_now(mut self, now: NaiveDateTime) -> Self {
        self.clock = Arc::new(move || now);
        self
    }

    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }
}
