//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Optional embedded migrations
//!
//! The hang-glider exclusion and the flight scope are pushed into SQL; the
//! analytics themselves run in-process over the returned rows.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 5)
//! - `PG_POOL_MIN`: Minimum idle connections (default: 0)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 2)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 20)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)
//! - `PG_RUN_MIGRATIONS`: Apply embedded migrations on startup (default: false)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

use crate::api::{GliderId, TakeoffId};
use crate::db::repository::{
    DirectoryRepository, ErrorContext, FlightRepository, RepositoryError, RepositoryResult,
};
use crate::models::{FlightScope, FlightView, Glider, GliderCategory, Pilot, Takeoff};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub database_url: String,
    pub max_pool_size: u32,
    /// Minimum number of idle connections kept open
    pub min_pool_size: u32,
    pub connection_timeout_sec: u64,
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
    /// Apply the embedded schema migrations when the repository is created
    pub run_migrations: bool,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 5,
            min_pool_size: 0,
            connection_timeout_sec: 2,
            idle_timeout_sec: 20,
            max_retries: 3,
            retry_delay_ms: 100,
            run_migrations: false,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables (see module docs).
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
            run_migrations: env_or("PG_RUN_MIGRATIONS", defaults.run_migrations),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    pub connections_in_use: u32,
    pub idle_connections: u32,
    pub total_connections: u32,
    pub max_size: u32,
    pub total_queries: u64,
    pub failed_queries: u64,
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

/// Restrict a boxed flights query to one scope.
macro_rules! apply_scope {
    ($query:expr, $scope:expr) => {
        match $scope {
            FlightScope::All => $query,
            FlightScope::Pilot(id) => $query.filter(flights::pilot_id.eq(id.value())),
            FlightScope::Takeoff(id) => $query.filter(flights::takeoff_id.eq(id.value())),
            FlightScope::Glider(id) => $query.filter(flights::glider_id.eq(id.value())),
        }
    };
}

fn paraglider_categories() -> Vec<&'static str> {
    GliderCategory::paraglider_classes()
        .map(|c| c.as_str())
        .collect()
}

impl PostgresRepository {
    /// Create a new repository, applying migrations when configured to.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        if config.run_migrations {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        log::info!("Applied pending flight-log migrations");
        Ok(())
    }

    /// Execute a blocking Diesel operation off the async runtime, retrying
    /// transient failures with exponential backoff.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1)),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        log::warn!("Retrying after transient error: {}", e);
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Current pool state and query counters.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl FlightRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let healthy = self
            .with_conn(|conn| {
                sql_query("SELECT 1")
                    .execute(conn)
                    .map(|_| true)
                    .map_err(|e| RepositoryError::from(e).with_operation("health_check"))
            })
            .await?;
        log::debug!("Postgres health check ok: {:?}", self.get_pool_stats());
        Ok(healthy)
    }

    async fn scan_flights(&self, scope: FlightScope) -> RepositoryResult<Vec<FlightView>> {
        let rows = self
            .with_conn(move |conn| {
                let query = flights::table
                    .inner_join(pilots::table)
                    .inner_join(gliders::table)
                    .left_join(takeoffs::table)
                    .filter(gliders::category.eq_any(paraglider_categories()))
                    .select((
                        flights::all_columns,
                        pilots::all_columns,
                        gliders::all_columns,
                        takeoffs::all_columns.nullable(),
                    ))
                    .order(flights::id.asc())
                    .into_boxed();

                apply_scope!(query, scope)
                    .load::<JoinedFlightRow>(conn)
                    .map_err(|e| RepositoryError::from(e).with_operation("scan_flights"))
            })
            .await?;

        log::debug!("Scanned {} flights for scope {}", rows.len(), scope);
        rows.into_iter().map(into_flight_view).collect()
    }
}

#[async_trait]
impl DirectoryRepository for PostgresRepository {
    async fn get_pilot_by_username(&self, username: &str) -> RepositoryResult<Option<Pilot>> {
        let username = username.to_string();
        let row = self
            .with_conn(move |conn| {
                pilots::table
                    .filter(pilots::username.eq(&username))
                    .first::<PilotRow>(conn)
                    .optional()
                    .map_err(|e| RepositoryError::from(e).with_operation("get_pilot_by_username"))
            })
            .await?;
        Ok(row.map(Pilot::from))
    }

    async fn get_takeoff(&self, id: TakeoffId) -> RepositoryResult<Option<Takeoff>> {
        let row = self
            .with_conn(move |conn| {
                takeoffs::table
                    .find(id.value())
                    .first::<TakeoffRow>(conn)
                    .optional()
                    .map_err(|e| RepositoryError::from(e).with_operation("get_takeoff"))
            })
            .await?;
        row.map(Takeoff::try_from).transpose()
    }

    async fn get_glider(&self, id: GliderId) -> RepositoryResult<Option<Glider>> {
        let row = self
            .with_conn(move |conn| {
                gliders::table
                    .find(id.value())
                    .first::<GliderRow>(conn)
                    .optional()
                    .map_err(|e| RepositoryError::from(e).with_operation("get_glider"))
            })
            .await?;
        row.map(Glider::try_from).transpose()
    }

    async fn list_pilots(&self) -> RepositoryResult<Vec<Pilot>> {
        let rows = self
            .with_conn(|conn| {
                pilots::table
                    .order(pilots::id.asc())
                    .load::<PilotRow>(conn)
                    .map_err(|e| RepositoryError::from(e).with_operation("list_pilots"))
            })
            .await?;
        Ok(rows.into_iter().map(Pilot::from).collect())
    }

    async fn list_takeoffs(&self) -> RepositoryResult<Vec<Takeoff>> {
        let rows = self
            .with_conn(|conn| {
                takeoffs::table
                    .order(takeoffs::id.asc())
                    .load::<TakeoffRow>(conn)
                    .map_err(|e| RepositoryError::from(e).with_operation("list_takeoffs"))
            })
            .await?;
        rows.into_iter().map(Takeoff::try_from).collect()
    }

    async fn list_gliders(&self) -> RepositoryResult<Vec<Glider>> {
        let rows = self
            .with_conn(|conn| {
                gliders::table
                    .order(gliders::id.asc())
                    .load::<GliderRow>(conn)
                    .map_err(|e| RepositoryError::from(e).with_operation("list_gliders"))
            })
            .await?;
        rows.into_iter().map(Glider::try_from).collect()
    }

    async fn count_pilots(&self) -> RepositoryResult<usize> {
        let count = self
            .with_conn(|conn| {
                pilots::table
                    .count()
                    .get_result::<i64>(conn)
                    .map_err(|e| RepositoryError::from(e).with_operation("count_pilots"))
            })
            .await?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_settings() {
        let config = PostgresConfig::with_url("postgres://localhost/xc");
        assert_eq!(config.max_pool_size, 5);
        assert_eq!(config.idle_timeout_sec, 20);
        assert_eq!(config.connection_timeout_sec, 2);
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_paraglider_filter_excludes_hang_gliders() {
        let categories = paraglider_categories();
        assert!(categories.contains(&"CCC"));
        assert!(!categories.contains(&"HG"));
        assert!(!categories.contains(&"RHG"));
    }
}
