use std::time::Duration;

use crate::error::Result;
use crate::store::pool::PostgresStore;

impl PostgresStore {
    /// The one admin-tunable knob the Collector re-reads at runtime: how
    /// often `collect_throughput`/`collect_connected_devices` tick. Stored
    /// relationally (not just read from the environment once at startup)
    /// so changing it doesn't require restarting the scheduler process.
    pub async fn get_refresh_interval(&self) -> Result<Duration> {
        let secs: i32 = sqlx::query_scalar(
            "SELECT refresh_interval_secs FROM scheduler_settings WHERE id",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(Duration::from_secs(secs.max(1) as u64))
    }

    pub async fn set_refresh_interval(&self, interval: Duration) -> Result<()> {
        sqlx::query(
            "UPDATE scheduler_settings SET refresh_interval_secs = $1, updated_at = NOW() WHERE id",
        )
        .bind(interval.as_secs() as i32)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
