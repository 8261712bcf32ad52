use chrono::{DateTime, Utc};
use panfm_model::{DeviceId, MaintenanceWindow};
use uuid::Uuid;

use crate::error::Result;
use crate::store::pool::PostgresStore;

/// Persistence for maintenance window suppression intervals. Evaluation
/// (whether a given device/time is currently covered) lives in
/// [`crate::alert`]; this module is CRUD plus the one lookup the Alert
/// Engine calls on every evaluation pass.
impl PostgresStore {
    pub async fn create_maintenance_window(
        &self,
        device_id: Option<DeviceId>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        reason: Option<String>,
    ) -> Result<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO maintenance_window (id, device_id, starts_at, ends_at, reason, enabled)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            "#,
        )
        .bind(id)
        .bind(device_id)
        .bind(starts_at)
        .bind(ends_at)
        .bind(reason)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn set_maintenance_window_enabled(&self, id: Uuid, enabled: bool) -> Result<()> {
        sqlx::query("UPDATE maintenance_window SET enabled = $2 WHERE id = $1")
            .bind(id)
            .bind(enabled)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn delete_maintenance_window(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM maintenance_window WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Windows that are enabled and either global (`device_id IS NULL`) or
    /// scoped to `device_id`, regardless of whether they currently cover
    /// `now` — callers filter with [`MaintenanceWindow::covers`].
    pub async fn list_maintenance_windows(&self, device_id: DeviceId) -> Result<Vec<MaintenanceWindow>> {
        let rows: Vec<MaintenanceWindowRow> = sqlx::query_as(
            r#"
            SELECT device_id, starts_at, ends_at, reason
            FROM maintenance_window
            WHERE enabled AND (device_id IS NULL OR device_id = $1)
            "#,
        )
        .bind(device_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| MaintenanceWindow {
                device_id: row.device_id.unwrap_or(device_id),
                starts_at: row.starts_at,
                ends_at: row.ends_at,
                reason: row.reason,
            })
            .collect())
    }

    /// True if `device_id` is currently inside an enabled maintenance
    /// window, global or device-scoped.
    pub async fn in_maintenance_window(&self, device_id: DeviceId, at: DateTime<Utc>) -> Result<bool> {
        let windows = self.list_maintenance_windows(device_id).await?;
        Ok(windows.iter().any(|w| w.covers(at)))
    }
}

#[derive(sqlx::FromRow)]
struct MaintenanceWindowRow {
    device_id: Option<DeviceId>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    reason: Option<String>,
}
