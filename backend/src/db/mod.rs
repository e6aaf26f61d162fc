//! Flight-log storage and query orchestration.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP layer (http/) or any other caller                 │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - scans the primary view once per request              │
//! │  - hands rows to the pure engines in crate::services    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/)                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!        ┌────────────┴─────────────┐
//!   Local (in-memory)       Postgres (Diesel + r2d2)
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use xcstats::db::{services, RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_env().await?;
//!     let records = services::records_overview(repo.as_ref()).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::{PoolStats, PostgresConfig};
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    _private: (),
}

pub use services::{
    health_check, home_dashboard, list_flights, pilot_detail, pilot_list, records_overview,
    takeoff_detail, takeoff_list, wing_detail, wing_list,
};

pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::local::Dataset;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    DirectoryRepository, ErrorContext, FlightRepository, FullRepository, RepositoryError,
    RepositoryResult,
};

use anyhow::{Context, Result};
use std::sync::Arc;

/// Build the repository for this process.
///
/// Selection order: `REPOSITORY_CONFIG`, then a `repository.toml` in the
/// standard locations, then plain environment variables.
pub async fn init_repository() -> Result<Arc<dyn FullRepository>> {
    let config_path = std::env::var_os("REPOSITORY_CONFIG")
        .map(std::path::PathBuf::from)
        .or_else(RepositoryConfig::default_location);

    let repo = match config_path {
        Some(path) => {
            log::info!("Using repository config {}", path.display());
            RepositoryFactory::from_config_file(path).await
        }
        None => {
            log::debug!("No repository.toml found; configuring repository from environment");
            RepositoryFactory::from_env().await
        }
    };
    repo.context("Failed to initialize flight repository")
}
