use std::fmt;
use std::time::Duration;

use panfm_config::DatabaseConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use tracing::info;

use crate::error::Result;

/// Embedded migration set, exposed so integration tests can spin up a
/// throwaway database with `#[sqlx::test(migrator = "crate::store::MIGRATOR")]`
/// instead of shelling out to a migration CLI.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Snapshot of pool occupancy, exposed for health/readiness endpoints.
#[derive(Debug, Clone, Copy)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub max_size: u32,
    pub min_size: u32,
}

#[derive(Clone)]
pub struct PostgresStore {
    pub(crate) pool: PgPool,
    max_connections: u32,
    min_connections: u32,
}

impl fmt::Debug for PostgresStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresStore")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .finish()
    }
}

impl PostgresStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let connect_options = Self::build_connect_options(config)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .max_lifetime(config.max_lifetime)
            .idle_timeout(config.idle_timeout)
            .test_before_acquire(true)
            .after_connect({
                let statement_timeout_ms = config.statement_timeout.as_millis() as i64;
                move |conn, _meta| {
                    Box::pin(async move {
                        sqlx::query(&format!("SET statement_timeout = {statement_timeout_ms}"))
                            .execute(conn)
                            .await?;
                        Ok(())
                    })
                }
            })
            .connect_with(connect_options)
            .await?;

        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "time-series store pool initialized"
        );

        Ok(Self {
            pool,
            max_connections: config.max_connections,
            min_connections: config.min_connections,
        })
    }

    fn build_connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions> {
        if let Some(dsn) = &config.connection_string {
            return Ok(dsn.parse::<PgConnectOptions>()?);
        }

        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .database(&config.database_name)
            .ssl_mode(PgSslMode::Prefer);

        if !config.password.is_empty() {
            options = options.password(&config.password);
        }

        Ok(options)
    }

    /// Validates that the database reachable and the expected extension
    /// (TimescaleDB) is installed, with an actionable error pointing at the
    /// missing `CREATE EXTENSION` rather than a bare connection failure.
    pub async fn preflight_check(&self) -> Result<()> {
        let has_timescale: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM pg_extension WHERE extname = 'timescaledb')",
        )
        .fetch_one(&self.pool)
        .await?;

        if !has_timescale {
            tracing::warn!(
                "timescaledb extension not found; hypertable creation in migrations will fail. \
                 Run `CREATE EXTENSION IF NOT EXISTS timescaledb;` as a superuser first."
            );
        }

        Ok(())
    }

    pub async fn run_migrations(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    /// Wraps an already-connected pool, for tests driven by `#[sqlx::test]`
    /// fixtures rather than [`Self::connect`].
    pub fn from_pool(pool: PgPool) -> Self {
        let max_connections = pool.size();
        Self { pool, max_connections, min_connections: 0 }
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle() as u32,
            max_size: self.max_connections,
            min_size: self.min_connections,
        }
    }

    /// Cheap liveness probe for the API's `/healthz` endpoint: a single
    /// round trip with a short deadline rather than `preflight_check`'s
    /// fuller validation.
    pub async fn ping(&self) -> Result<()> {
        tokio::time::timeout(Duration::from_secs(2), sqlx::query("SELECT 1").execute(&self.pool))
            .await
            .map_err(|_| sqlx::Error::PoolTimedOut)??;
        Ok(())
    }
}
