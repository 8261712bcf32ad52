use chrono::{DateTime, Utc};
use panfm_model::DeviceId;
use std::collections::HashMap;

use crate::error::Result;
use crate::store::pool::PostgresStore;

/// Hypertables and device-scoped relational tables that carry a `device_id`
/// column, in the order they're swept by [`PostgresStore::clear_device_data`]
/// and [`PostgresStore::clear_all_data`].
const DEVICE_SCOPED_TABLES: &[&str] = &[
    "throughput_samples",
    "application_samples",
    "category_bandwidth",
    "client_bandwidth",
    "traffic_flows",
    "connected_devices",
    "threat_logs",
    "alert_history",
];

impl PostgresStore {
    pub async fn get_oldest_sample_time(&self, device_id: Option<DeviceId>) -> Result<Option<DateTime<Utc>>> {
        let row: Option<(Option<DateTime<Utc>>,)> = match device_id {
            Some(device_id) => {
                sqlx::query_as("SELECT MIN(time) FROM throughput_samples WHERE device_id = $1")
                    .bind(device_id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT MIN(time) FROM throughput_samples")
                    .fetch_optional(&self.pool)
                    .await?
            }
        };

        Ok(row.and_then(|(t,)| t))
    }

    pub async fn get_device_sample_counts(&self) -> Result<HashMap<DeviceId, i64>> {
        let rows: Vec<(DeviceId, i64)> = sqlx::query_as(
            r#"
            SELECT device_id, COUNT(*)::bigint
            FROM throughput_samples
            GROUP BY device_id
            ORDER BY COUNT(*) DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Per-table on-disk size plus total database size, for an operator
    /// storage dashboard.
    pub async fn get_storage_stats(&self) -> Result<StorageStats> {
        let total_size: i64 = sqlx::query_scalar("SELECT pg_database_size(current_database())")
            .fetch_one(&self.pool)
            .await?;

        let table_rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT tablename, pg_total_relation_size('public.' || tablename)::bigint
            FROM pg_tables
            WHERE schemaname = 'public'
              AND tablename = ANY($1)
            ORDER BY pg_total_relation_size('public.' || tablename) DESC
            "#,
        )
        .bind(DEVICE_SCOPED_TABLES)
        .fetch_all(&self.pool)
        .await?;

        Ok(StorageStats {
            total_database_bytes: total_size,
            table_bytes: table_rows.into_iter().collect(),
        })
    }

    /// Deletes every row for one device across all hypertables and
    /// device-scoped tables. Irreversible; callers are expected to gate this
    /// behind an explicit operator confirmation, not expose it unguarded.
    pub async fn clear_device_data(&self, device_id: DeviceId) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut total = 0u64;
        for table in DEVICE_SCOPED_TABLES {
            let result = sqlx::query(&format!("DELETE FROM {table} WHERE device_id = $1"))
                .bind(device_id)
                .execute(&mut *tx)
                .await?;
            total += result.rows_affected();
        }
        tx.commit().await?;
        Ok(total)
    }

    /// Truncates every hypertable and device-scoped table. There is no
    /// confirmation prompt at this layer; the caller owns that.
    pub async fn clear_all_data(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for table in DEVICE_SCOPED_TABLES {
            sqlx::query(&format!("TRUNCATE TABLE {table}"))
                .execute(&mut *tx)
                .await?;
        }
        sqlx::query("TRUNCATE TABLE scheduler_stats_history")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct StorageStats {
    pub total_database_bytes: i64,
    pub table_bytes: HashMap<String, i64>,
}
