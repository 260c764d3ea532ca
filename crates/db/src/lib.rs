//! Postgres adapter for the bookings service.
//!
//! Owns pool construction, migrations, row models and repositories, and the
//! [`store::PgBookingStore`] / [`store::PgDraftStore`] port implementations.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod store;

pub type DbPool = sqlx::PgPool;

/// Failure reading database settings from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a valid number, got '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Connection pool settings.
///
/// Each limit is independent: a connection count never doubles as a
/// duration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Maximum number of open connections (default: `10`).
    pub max_connections: u32,
    /// Connections kept open while idle (default: `0`).
    pub min_connections: u32,
    /// How long a request waits for a free connection (default: 5s).
    pub acquire_timeout: Duration,
    /// Idle connections are closed after this long (default: 5 min).
    pub idle_timeout: Duration,
    /// Connections are recycled after this long (default: 30 min).
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    /// Load settings from the environment.
    ///
    /// | Env Var                   | Default  |
    /// |---------------------------|----------|
    /// | `DATABASE_URL`            | required |
    /// | `DB_MAX_CONNECTIONS`      | `10`     |
    /// | `DB_MIN_CONNECTIONS`      | `0`      |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `5`      |
    /// | `DB_IDLE_TIMEOUT_SECS`    | `300`    |
    /// | `DB_MAX_LIFETIME_SECS`    | `1800`   |
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            url,
            max_connections: env_number("DB_MAX_CONNECTIONS", 10)?,
            min_connections: env_number("DB_MIN_CONNECTIONS", 0)?,
            acquire_timeout: Duration::from_secs(env_number("DB_ACQUIRE_TIMEOUT_SECS", 5)?),
            idle_timeout: Duration::from_secs(env_number("DB_IDLE_TIMEOUT_SECS", 300)?),
            max_lifetime: Duration::from_secs(env_number("DB_MAX_LIFETIME_SECS", 1800)?),
        })
    }
}

fn env_number<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

/// Create a connection pool from the given settings.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await
}

/// Round-trip a trivial query to verify connectivity.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
