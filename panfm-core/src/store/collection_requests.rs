use chrono::{DateTime, Utc};
use panfm_model::{CollectionRequest, CollectionRequestId, CollectionRequestStatus, DeviceId};

use crate::error::Result;
use crate::store::pool::PostgresStore;

impl PostgresStore {
    /// Enqueues an on-demand collection unless one is already `queued` or
    /// `running` for this device, so a user mashing "collect now" doesn't
    /// pile up redundant work for the Collector's poller.
    pub async fn create_collection_request(&self, device_id: DeviceId) -> Result<CollectionRequest> {
        if let Some(existing) = self.get_active_collection_request(device_id).await? {
            return Ok(existing);
        }

        let row: CollectionRequestRow = sqlx::query_as(
            r#"
            INSERT INTO collection_requests (device_id, status, requested_at)
            VALUES ($1, 'queued', NOW())
            RETURNING id, device_id, status, requested_at, started_at, completed_at, error_message
            "#,
        )
        .bind(device_id)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get_active_collection_request(&self, device_id: DeviceId) -> Result<Option<CollectionRequest>> {
        let row: Option<CollectionRequestRow> = sqlx::query_as(
            r#"
            SELECT id, device_id, status, requested_at, started_at, completed_at, error_message
            FROM collection_requests
            WHERE device_id = $1 AND status IN ('queued', 'running')
            ORDER BY requested_at DESC
            LIMIT 1
            "#,
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    pub async fn get_collection_request(&self, id: CollectionRequestId) -> Result<Option<CollectionRequest>> {
        let row: Option<CollectionRequestRow> = sqlx::query_as(
            r#"
            SELECT id, device_id, status, requested_at, started_at, completed_at, error_message
            FROM collection_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    pub async fn get_pending_collection_requests(&self) -> Result<Vec<CollectionRequest>> {
        let rows: Vec<CollectionRequestRow> = sqlx::query_as(
            r#"
            SELECT id, device_id, status, requested_at, started_at, completed_at, error_message
            FROM collection_requests
            WHERE status = 'queued'
            ORDER BY requested_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    pub async fn mark_collection_request_running(&self, id: CollectionRequestId) -> Result<()> {
        sqlx::query("UPDATE collection_requests SET status = 'running', started_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn mark_collection_request_completed(&self, id: CollectionRequestId) -> Result<()> {
        sqlx::query(
            "UPDATE collection_requests SET status = 'completed', completed_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn mark_collection_request_failed(&self, id: CollectionRequestId, error_message: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE collection_requests
            SET status = 'failed', completed_at = NOW(), error_message = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(error_message)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn cleanup_old_collection_requests(&self, older_than: chrono::Duration) -> Result<u64> {
        let cutoff = Utc::now() - older_than;
        let result = sqlx::query(
            r#"
            DELETE FROM collection_requests
            WHERE requested_at < $1 AND status IN ('completed', 'failed')
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct CollectionRequestRow {
    id: CollectionRequestId,
    device_id: DeviceId,
    status: String,
    requested_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    error_message: Option<String>,
}

impl TryFrom<CollectionRequestRow> for CollectionRequest {
    type Error = crate::error::CoreError;

    fn try_from(row: CollectionRequestRow) -> std::result::Result<Self, Self::Error> {
        let status = match row.status.as_str() {
            "queued" => CollectionRequestStatus::Queued,
            "running" => CollectionRequestStatus::Running,
            "completed" => CollectionRequestStatus::Completed,
            "failed" => CollectionRequestStatus::Failed,
            other => {
                return Err(crate::error::CoreError::Config(format!(
                    "unknown collection request status {other}"
                )))
            }
        };

        Ok(CollectionRequest {
            id: row.id,
            device_id: row.device_id,
            status,
            requested_at: row.requested_at,
            started_at: row.started_at,
            completed_at: row.completed_at,
            error_message: row.error_message,
        })
    }
}
