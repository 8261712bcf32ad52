use panfm_model::{DeviceId, DeviceMetadata};

use crate::error::Result;
use crate::store::pool::PostgresStore;

impl PostgresStore {
    pub async fn get_device_metadata(&self, device_id: DeviceId, mac: &str) -> Result<Option<DeviceMetadata>> {
        let row: Option<DeviceMetadataRow> = sqlx::query_as(
            r#"
            SELECT device_id, mac, custom_name, location, comment, tags
            FROM device_metadata
            WHERE device_id = $1 AND mac = $2
            "#,
        )
        .bind(device_id)
        .bind(mac)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn upsert_device_metadata(&self, metadata: &DeviceMetadata) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO device_metadata (device_id, mac, custom_name, location, comment, tags)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (device_id, mac) DO UPDATE SET
                custom_name = EXCLUDED.custom_name,
                location = EXCLUDED.location,
                comment = EXCLUDED.comment,
                tags = EXCLUDED.tags
            "#,
        )
        .bind(metadata.device_id)
        .bind(&metadata.mac)
        .bind(&metadata.custom_name)
        .bind(&metadata.location)
        .bind(&metadata.comment)
        .bind(&metadata.tags)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_device_metadata(&self, device_id: DeviceId, mac: &str) -> Result<()> {
        sqlx::query("DELETE FROM device_metadata WHERE device_id = $1 AND mac = $2")
            .bind(device_id)
            .bind(mac)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Tags carried by a single device, across all MACs annotated on it.
    pub async fn get_device_tags(&self, device_id: DeviceId) -> Result<Vec<String>> {
        let rows: Vec<(Vec<String>,)> =
            sqlx::query_as("SELECT tags FROM device_metadata WHERE device_id = $1")
                .bind(device_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(dedup_sorted(rows.into_iter().flat_map(|(t,)| t)))
    }

    /// Every distinct tag used across the fleet, for populating tag-filter pickers.
    pub async fn get_all_tags_global(&self) -> Result<Vec<String>> {
        let rows: Vec<(Vec<String>,)> = sqlx::query_as("SELECT tags FROM device_metadata")
            .fetch_all(&self.pool)
            .await?;

        Ok(dedup_sorted(rows.into_iter().flat_map(|(t,)| t)))
    }

    /// Tags paired with how many (device, mac) rows carry each one.
    pub async fn get_tags_with_usage(&self) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT tag, COUNT(*)::bigint
            FROM device_metadata, UNNEST(tags) AS tag
            GROUP BY tag
            ORDER BY tag
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Renames a tag wherever it appears; a no-op for rows that don't carry it.
    pub async fn rename_tag(&self, old_name: &str, new_name: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE device_metadata
            SET tags = ARRAY_REPLACE(tags, $1, $2)
            WHERE $1 = ANY(tags)
            "#,
        )
        .bind(old_name)
        .bind(new_name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_tag(&self, tag: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE device_metadata
            SET tags = ARRAY_REMOVE(tags, $1)
            WHERE $1 = ANY(tags)
            "#,
        )
        .bind(tag)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_device_locations(&self, device_id: DeviceId) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT location FROM device_metadata
            WHERE device_id = $1 AND location IS NOT NULL
            ORDER BY location
            "#,
        )
        .bind(device_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(l,)| l).collect())
    }

    pub async fn get_all_locations_global(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT location FROM device_metadata WHERE location IS NOT NULL ORDER BY location",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(l,)| l).collect())
    }
}

fn dedup_sorted(iter: impl Iterator<Item = String>) -> Vec<String> {
    let mut tags: Vec<String> = iter.collect();
    tags.sort();
    tags.dedup();
    tags
}

#[derive(sqlx::FromRow)]
struct DeviceMetadataRow {
    device_id: DeviceId,
    mac: String,
    custom_name: Option<String>,
    location: Option<String>,
    comment: Option<String>,
    tags: Vec<String>,
}

impl From<DeviceMetadataRow> for DeviceMetadata {
    fn from(row: DeviceMetadataRow) -> Self {
        DeviceMetadata {
            device_id: row.device_id,
            mac: row.mac,
            custom_name: row.custom_name,
            location: row.location,
            comment: row.comment,
            tags: row.tags,
        }
    }
}
