use chrono::{DateTime, Utc};
use panfm_model::{DeviceId, ThreatLog, ThreatSeverity};
use serde_json::Value;

use crate::error::Result;
use crate::store::pool::PostgresStore;

impl PostgresStore {
    pub async fn insert_threat_logs(&self, device_id: DeviceId, logs: &[ThreatLog]) -> Result<()> {
        if logs.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for log in logs {
            sqlx::query(
                r#"
                INSERT INTO threat_logs (
                    time, device_id, severity, threat, source_ip,
                    destination_ip, application, action, rule, log_data
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ON CONFLICT (device_id, time) DO NOTHING
                "#,
            )
            .bind(log.time)
            .bind(device_id)
            .bind(log.severity.as_str())
            .bind(&log.threat)
            .bind(&log.source_ip)
            .bind(&log.destination_ip)
            .bind(&log.application)
            .bind(&log.action)
            .bind(&log.rule)
            .bind(&log.log_data)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn get_threat_logs(
        &self,
        device_id: DeviceId,
        severity: Option<ThreatSeverity>,
        limit: i64,
    ) -> Result<Vec<ThreatLog>> {
        let rows: Vec<ThreatLogRow> = match severity {
            Some(severity) => {
                sqlx::query_as(
                    r#"
                    SELECT time, device_id, severity, threat, source_ip, destination_ip,
                           application, action, rule, log_data
                    FROM threat_logs
                    WHERE device_id = $1 AND severity = $2
                    ORDER BY time DESC
                    LIMIT $3
                    "#,
                )
                .bind(device_id)
                .bind(severity.as_str())
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT time, device_id, severity, threat, source_ip, destination_ip,
                           application, action, rule, log_data
                    FROM threat_logs
                    WHERE device_id = $1 AND severity != 'url-filter'
                    ORDER BY time DESC
                    LIMIT $2
                    "#,
                )
                .bind(device_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Dedicated accessor for the URL-filtering log type, kept separate
    /// from [`Self::get_threat_logs`] because the original exposes it as
    /// its own endpoint rather than a severity filter a caller opts into.
    pub async fn get_url_filtering_logs(
        &self,
        device_id: DeviceId,
        limit: i64,
    ) -> Result<Vec<ThreatLog>> {
        self.get_threat_logs(device_id, Some(ThreatSeverity::UrlFilter), limit)
            .await
    }
}

#[derive(sqlx::FromRow)]
struct ThreatLogRow {
    time: DateTime<Utc>,
    device_id: DeviceId,
    severity: String,
    threat: Option<String>,
    source_ip: Option<String>,
    destination_ip: Option<String>,
    application: Option<String>,
    action: Option<String>,
    rule: Option<String>,
    log_data: Value,
}

impl TryFrom<ThreatLogRow> for ThreatLog {
    type Error = crate::error::CoreError;

    fn try_from(row: ThreatLogRow) -> std::result::Result<Self, Self::Error> {
        let severity = row
            .severity
            .parse()
            .map_err(|_| crate::error::CoreError::Config(format!("bad severity {}", row.severity)))?;
        Ok(ThreatLog {
            time: row.time,
            device_id: row.device_id,
            severity,
            threat: row.threat,
            source_ip: row.source_ip,
            destination_ip: row.destination_ip,
            application: row.application,
            action: row.action,
            rule: row.rule,
            log_data: row.log_data,
        })
    }
}
