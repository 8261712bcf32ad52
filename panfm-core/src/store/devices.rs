use panfm_model::{Device, DeviceId};

use crate::error::Result;
use crate::store::pool::PostgresStore;

impl PostgresStore {
    pub async fn list_devices(&self, enabled_only: bool) -> Result<Vec<Device>> {
        let rows: Vec<DeviceRow> = if enabled_only {
            sqlx::query_as(
                "SELECT id, name, ip, credential_ref, enabled FROM devices WHERE enabled = TRUE",
            )
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as("SELECT id, name, ip, credential_ref, enabled FROM devices")
                .fetch_all(&self.pool)
                .await?
        };

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_device(&self, id: DeviceId) -> Result<Option<Device>> {
        let row: Option<DeviceRow> = sqlx::query_as(
            "SELECT id, name, ip, credential_ref, enabled FROM devices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn upsert_device(&self, device: &Device) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO devices (id, name, ip, credential_ref, enabled, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                ip = EXCLUDED.ip,
                credential_ref = EXCLUDED.credential_ref,
                enabled = EXCLUDED.enabled,
                updated_at = NOW()
            "#,
        )
        .bind(device.id)
        .bind(&device.name)
        .bind(&device.ip)
        .bind(&device.credential_ref)
        .bind(device.enabled)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_device(&self, id: DeviceId) -> Result<()> {
        sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct DeviceRow {
    id: DeviceId,
    name: String,
    ip: String,
    credential_ref: String,
    enabled: bool,
}

impl From<DeviceRow> for Device {
    fn from(row: DeviceRow) -> Self {
        Device {
            id: row.id,
            name: row.name,
            ip: row.ip,
            credential_ref: row.credential_ref,
            enabled: row.enabled,
        }
    }
}
