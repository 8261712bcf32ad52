use chrono::{DateTime, Utc};
use panfm_model::SchedulerStatsRow as SchedulerStats;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::Result;
use crate::store::pool::PostgresStore;

impl PostgresStore {
    pub async fn insert_scheduler_stats(&self, stats: &SchedulerStats) -> Result<()> {
        let jobs = serde_json::to_value(&stats.jobs)?;
        sqlx::query(
            r#"
            INSERT INTO scheduler_stats_history (
                time, uptime_seconds, total_executions, total_errors, last_execution, jobs
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(stats.timestamp)
        .bind(stats.uptime_seconds)
        .bind(stats.total_executions)
        .bind(stats.total_errors)
        .bind(stats.last_execution)
        .bind(jobs)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_latest_scheduler_stats(&self) -> Result<Option<SchedulerStats>> {
        let row: Option<SchedulerStatsRowDb> = sqlx::query_as(
            r#"
            SELECT time, uptime_seconds, total_executions, total_errors, last_execution, jobs
            FROM scheduler_stats_history
            ORDER BY time DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Unconditional retention sweep — this table is kept indefinitely by the
    /// original, but the REDESIGN FLAGS call for the same bounded-retention
    /// treatment every other history table gets.
    pub async fn cleanup_old_scheduler_stats(&self, older_than: chrono::Duration) -> Result<u64> {
        let cutoff = Utc::now() - older_than;
        let result = sqlx::query("DELETE FROM scheduler_stats_history WHERE time < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct SchedulerStatsRowDb {
    time: DateTime<Utc>,
    uptime_seconds: i64,
    total_executions: i64,
    total_errors: i64,
    last_execution: Option<DateTime<Utc>>,
    jobs: Value,
}

impl TryFrom<SchedulerStatsRowDb> for SchedulerStats {
    type Error = crate::error::CoreError;

    fn try_from(row: SchedulerStatsRowDb) -> std::result::Result<Self, Self::Error> {
        let jobs: HashMap<String, Value> = serde_json::from_value(row.jobs)?;
        Ok(SchedulerStats {
            timestamp: row.time,
            uptime_seconds: row.uptime_seconds,
            total_executions: row.total_executions,
            total_errors: row.total_errors,
            last_execution: row.last_execution,
            jobs,
        })
    }
}
