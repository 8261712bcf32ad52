use std::env;
use std::time::Duration;

use crate::database::DatabaseConfig;

/// Collector process configuration. Defaults match the original's
/// `settings.get(..., default)` fallbacks so an unconfigured deployment
/// behaves the same as before: throughput/connected-devices polling every
/// 60s, traffic flows every 60s (fixed, not reconfigurable), 90-day
/// retention.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub database: DatabaseConfig,

    pub collection_enabled: bool,
    pub refresh_interval: Duration,
    pub traffic_flows_interval: Duration,
    pub retention_days: u32,

    /// Bounded per-tick fan-out across devices (spec concurrency model:
    /// 8-16 permits).
    pub device_concurrency: usize,

    pub stats_flush_interval: Duration,
    pub collection_request_poll_interval: Duration,
    pub cleanup_interval: Duration,
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database: DatabaseConfig::from_env(),
            collection_enabled: env_bool("THROUGHPUT_COLLECTION_ENABLED", true),
            refresh_interval: Duration::from_secs(env_u64("REFRESH_INTERVAL_SECS", 60)),
            traffic_flows_interval: Duration::from_secs(60),
            retention_days: env_u64("THROUGHPUT_RETENTION_DAYS", 90) as u32,
            device_concurrency: env_u64("DEVICE_CONCURRENCY", 12) as usize,
            stats_flush_interval: Duration::from_secs(60),
            collection_request_poll_interval: Duration::from_secs(5),
            cleanup_interval: Duration::from_secs(24 * 60 * 60),
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
