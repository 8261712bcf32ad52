//! Environment-variable driven configuration for the PANfm binaries.
//!
//! Every setting has a default so a bare `docker run` works out of the box;
//! production deployments override via env vars (or an `.env` file loaded
//! with `dotenvy`, mirroring the teacher's `dotenv::dotenv().ok()` call).

pub mod api;
pub mod database;
pub mod error;
pub mod notification;
pub mod scheduler;

pub use api::ApiConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use scheduler::SchedulerConfig;
