use chrono::{DateTime, Utc};
use panfm_model::{
    AlertConfig, AlertConfigId, AlertCooldown, AlertHistory, ComparisonOperator, DeviceId,
    NotificationChannelKind, Severity,
};

use crate::error::Result;
use crate::store::pool::PostgresStore;

/// Persistence for `AlertConfig`/`AlertHistory`/`AlertCooldown` rows. The
/// evaluation algorithm that reads these and decides whether to fire lives
/// in [`crate::alert`], not here — this module is CRUD only.
impl PostgresStore {
    pub async fn list_alert_configs(&self, enabled_only: bool) -> Result<Vec<AlertConfig>> {
        let rows: Vec<AlertConfigRow> = if enabled_only {
            sqlx::query_as(
                r#"
                SELECT id, device_id, metric_type, operator, threshold_value, severity, enabled,
                       notification_channels, created_at, updated_at
                FROM alert_config
                WHERE enabled = TRUE
                "#,
            )
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as(
                r#"
                SELECT id, device_id, metric_type, operator, threshold_value, severity, enabled,
                       notification_channels, created_at, updated_at
                FROM alert_config
                "#,
            )
            .fetch_all(&self.pool)
            .await?
        };

        rows.into_iter().map(TryInto::try_into).collect()
    }

    pub async fn create_alert_config(&self, config: &AlertConfig) -> Result<AlertConfig> {
        let channels: Vec<&'static str> =
            config.notification_channels.iter().copied().map(channel_kind_str).collect();

        let row: AlertConfigRow = sqlx::query_as(
            r#"
            INSERT INTO alert_config (
                id, device_id, metric_type, operator, threshold_value, severity, enabled,
                notification_channels
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, device_id, metric_type, operator, threshold_value, severity, enabled,
                      notification_channels, created_at, updated_at
            "#,
        )
        .bind(config.id)
        .bind(config.device_id)
        .bind(&config.metric_type)
        .bind(config.operator.as_str())
        .bind(config.threshold_value)
        .bind(config.severity.to_string())
        .bind(config.enabled)
        .bind(&channels)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    pub async fn set_alert_config_enabled(&self, id: AlertConfigId, enabled: bool) -> Result<()> {
        sqlx::query("UPDATE alert_config SET enabled = $2 WHERE id = $1")
            .bind(id)
            .bind(enabled)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn delete_alert_config(&self, id: AlertConfigId) -> Result<()> {
        sqlx::query("DELETE FROM alert_config WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn insert_alert_history(&self, entry: &AlertHistory) -> Result<AlertHistory> {
        let row: AlertHistoryRow = sqlx::query_as(
            r#"
            INSERT INTO alert_history (alert_config_id, device_id, triggered_at, actual_value, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, alert_config_id, device_id, triggered_at, actual_value, message
            "#,
        )
        .bind(entry.alert_config_id)
        .bind(entry.device_id)
        .bind(entry.triggered_at)
        .bind(entry.actual_value)
        .bind(&entry.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    pub async fn get_alert_history(&self, device_id: DeviceId, limit: i64) -> Result<Vec<AlertHistory>> {
        let rows: Vec<AlertHistoryRow> = sqlx::query_as(
            r#"
            SELECT id, alert_config_id, device_id, triggered_at, actual_value, message
            FROM alert_history
            WHERE device_id = $1
            ORDER BY triggered_at DESC
            LIMIT $2
            "#,
        )
        .bind(device_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_cooldown(
        &self,
        device_id: DeviceId,
        alert_config_id: AlertConfigId,
    ) -> Result<Option<AlertCooldown>> {
        let row: Option<(DateTime<Utc>,)> = sqlx::query_as(
            "SELECT expires_at FROM alert_cooldown WHERE device_id = $1 AND alert_config_id = $2",
        )
        .bind(device_id)
        .bind(alert_config_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(expires_at,)| AlertCooldown {
            device_id,
            alert_config_id,
            expires_at,
        }))
    }

    pub async fn upsert_cooldown(&self, cooldown: &AlertCooldown) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO alert_cooldown (device_id, alert_config_id, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (device_id, alert_config_id) DO UPDATE SET expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(cooldown.device_id)
        .bind(cooldown.alert_config_id)
        .bind(cooldown.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct AlertConfigRow {
    id: AlertConfigId,
    device_id: Option<DeviceId>,
    metric_type: String,
    operator: String,
    threshold_value: f64,
    severity: String,
    enabled: bool,
    notification_channels: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn channel_kind_str(kind: NotificationChannelKind) -> &'static str {
    match kind {
        NotificationChannelKind::Email => "email",
        NotificationChannelKind::Webhook => "webhook",
        NotificationChannelKind::Slack => "slack",
    }
}

impl TryFrom<AlertConfigRow> for AlertConfig {
    type Error = crate::error::CoreError;

    fn try_from(row: AlertConfigRow) -> std::result::Result<Self, Self::Error> {
        let operator = match row.operator.as_str() {
            ">" => ComparisonOperator::GreaterThan,
            ">=" => ComparisonOperator::GreaterThanOrEqual,
            "<" => ComparisonOperator::LessThan,
            "<=" => ComparisonOperator::LessThanOrEqual,
            "==" => ComparisonOperator::Equal,
            "!=" => ComparisonOperator::NotEqual,
            other => {
                return Err(crate::error::CoreError::Config(format!(
                    "unknown comparison operator {other}"
                )))
            }
        };
        let severity = match row.severity.as_str() {
            "info" => Severity::Info,
            "warning" => Severity::Warning,
            "critical" => Severity::Critical,
            other => {
                return Err(crate::error::CoreError::Config(format!("unknown severity {other}")))
            }
        };
        let notification_channels = row
            .notification_channels
            .iter()
            .map(|kind| match kind.as_str() {
                "email" => Ok(NotificationChannelKind::Email),
                "webhook" => Ok(NotificationChannelKind::Webhook),
                "slack" => Ok(NotificationChannelKind::Slack),
                other => Err(crate::error::CoreError::Config(format!(
                    "unknown notification channel kind {other}"
                ))),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(AlertConfig {
            id: row.id,
            device_id: row.device_id,
            metric_type: row.metric_type,
            operator,
            threshold_value: row.threshold_value,
            severity,
            enabled: row.enabled,
            notification_channels,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AlertHistoryRow {
    id: i64,
    alert_config_id: AlertConfigId,
    device_id: DeviceId,
    triggered_at: DateTime<Utc>,
    actual_value: f64,
    message: String,
}

impl From<AlertHistoryRow> for AlertHistory {
    fn from(row: AlertHistoryRow) -> Self {
        AlertHistory {
            id: row.id,
            alert_config_id: row.alert_config_id,
            device_id: row.device_id,
            triggered_at: row.triggered_at,
            actual_value: row.actual_value,
            message: row.message,
        }
    }
}
