//! Persistence Gateway for trend history and the discovery queue.
//!
//! The collection and discovery pipelines only see [`PersistenceGateway`].
//! [`PgGateway`] is the Postgres implementation, [`NoopGateway`] stands in when
//! no database is configured, and [`MemoryGateway`] backs tests and local runs.

mod gateway;
mod memory;
mod noop;
mod postgres;

use std::sync::Arc;
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

pub use gateway::PersistenceGateway;
pub use memory::{HistoryEntry, MemoryGateway, QueuedCandidate};
pub use noop::NoopGateway;
pub use postgres::PgGateway;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

// Path relative to crates/trendhunt-db/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &trendhunt_core::AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("failed to encode raw signals: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("score out of range for {field}: {value}")]
    ScoreOutOfRange { field: &'static str, value: u8 },
}

/// Connect to a Postgres pool using explicit URL and config.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the connection cannot be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await
}

/// Run all pending migrations against the pool.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if any migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Build the process-wide gateway from validated configuration.
///
/// Without `DATABASE_URL` this returns a [`NoopGateway`]: scoring still runs,
/// nothing is written. With it, the pool is connected and migrated up front so
/// that a bad URL fails startup instead of every later write.
///
/// # Errors
///
/// Returns [`DbError`] if the pool cannot connect or migrations fail.
pub async fn connect_gateway(
    config: &trendhunt_core::AppConfig,
) -> Result<Arc<dyn PersistenceGateway>, DbError> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; persistence disabled (no-op gateway)");
        return Ok(Arc::new(NoopGateway));
    };

    let pool = connect_pool(database_url, PoolConfig::from_app_config(config)).await?;
    run_migrations(&pool).await?;
    tracing::info!("persistence gateway connected");
    Ok(Arc::new(PgGateway::new(pool)))
}
