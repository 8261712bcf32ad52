use std::env;
use std::time::Duration;

/// Postgres/TimescaleDB connection settings, layered the way the teacher's
/// `PostgresDatabase::build_connect_options` does: `DATABASE_URL` (or an
/// explicit connection string) as the base, individual `PG*` vars as
/// per-field overrides on top.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub connection_string: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database_name: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub max_lifetime: Duration,
    pub idle_timeout: Duration,
    pub statement_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            connection_string: env::var("DATABASE_URL").ok(),
            host: env::var("PGHOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("PGPORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5432),
            user: env::var("PGUSER").unwrap_or_else(|_| "panfm".to_string()),
            password: env::var("PGPASSWORD").unwrap_or_default(),
            database_name: env::var("DATABASE_NAME").unwrap_or_else(|_| "panfm".to_string()),
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: Duration::from_secs(1800),
            idle_timeout: Duration::from_secs(600),
            statement_timeout: Duration::from_secs(30),
        }
    }
}
