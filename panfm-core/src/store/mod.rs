//! The Time-Series Store: a thin, typed wrapper around a Postgres
//! (TimescaleDB-compatible) connection pool. Every write is an idempotent
//! upsert or an accumulating upsert (never a plain `INSERT` that can
//! duplicate on at-least-once redelivery); every read accepts the device's
//! natural key rather than an internal row id.

mod admin;
mod alerts;
mod collection_requests;
mod connected_devices;
mod device_metadata;
mod devices;
mod maintenance;
mod notification_channels;
mod pool;
mod samples;
mod scheduler_stats;
mod settings;
mod threats;
mod traffic;

pub use pool::{PoolStats, PostgresStore};
pub use samples::{Resolution, SamplesQueryResult};

#[cfg(test)]
mod tests {
    // Integration tests for the store live in `panfm-core/tests/store.rs`
    // and require a reachable Postgres instance (`TEST_DATABASE_URL`); unit
    // tests here cover logic that doesn't need a live connection.
}
