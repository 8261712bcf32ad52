use panfm_model::{NotificationChannelConfig, NotificationChannelKind};

use crate::error::Result;
use crate::store::pool::PostgresStore;

impl PostgresStore {
    /// Relational override for a channel's config. Returns `None` when no
    /// row exists yet, letting the Notification Dispatcher fall back to
    /// `panfm_config::notification::channel_from_env`.
    pub async fn get_notification_channel(
        &self,
        kind: NotificationChannelKind,
    ) -> Result<Option<NotificationChannelConfig>> {
        let row: Option<NotificationChannelRow> = sqlx::query_as(
            r#"
            SELECT kind, enabled, smtp_host, smtp_port, smtp_user, smtp_password, smtp_tls,
                   from_email, to_emails, webhook_url, webhook_headers, slack_webhook_url,
                   slack_channel, slack_username
            FROM notification_channel
            WHERE kind = $1
            "#,
        )
        .bind(kind_str(kind))
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    pub async fn upsert_notification_channel(&self, config: &NotificationChannelConfig) -> Result<()> {
        let webhook_headers: Vec<String> = config
            .webhook_headers
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect();

        sqlx::query(
            r#"
            INSERT INTO notification_channel (
                kind, enabled, smtp_host, smtp_port, smtp_user, smtp_password, smtp_tls,
                from_email, to_emails, webhook_url, webhook_headers, slack_webhook_url,
                slack_channel, slack_username
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (kind) DO UPDATE SET
                enabled = EXCLUDED.enabled,
                smtp_host = EXCLUDED.smtp_host,
                smtp_port = EXCLUDED.smtp_port,
                smtp_user = EXCLUDED.smtp_user,
                smtp_password = EXCLUDED.smtp_password,
                smtp_tls = EXCLUDED.smtp_tls,
                from_email = EXCLUDED.from_email,
                to_emails = EXCLUDED.to_emails,
                webhook_url = EXCLUDED.webhook_url,
                webhook_headers = EXCLUDED.webhook_headers,
                slack_webhook_url = EXCLUDED.slack_webhook_url,
                slack_channel = EXCLUDED.slack_channel,
                slack_username = EXCLUDED.slack_username
            "#,
        )
        .bind(kind_str(config.kind))
        .bind(config.enabled)
        .bind(&config.smtp_host)
        .bind(config.smtp_port.map(|p| p as i32))
        .bind(&config.smtp_user)
        .bind(&config.smtp_password)
        .bind(config.smtp_tls)
        .bind(&config.from_email)
        .bind(&config.to_emails)
        .bind(&config.webhook_url)
        .bind(&webhook_headers)
        .bind(&config.slack_webhook_url)
        .bind(&config.slack_channel)
        .bind(&config.slack_username)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn kind_str(kind: NotificationChannelKind) -> &'static str {
    match kind {
        NotificationChannelKind::Email => "email",
        NotificationChannelKind::Webhook => "webhook",
        NotificationChannelKind::Slack => "slack",
    }
}

#[derive(sqlx::FromRow)]
struct NotificationChannelRow {
    kind: String,
    enabled: bool,
    smtp_host: Option<String>,
    smtp_port: Option<i32>,
    smtp_user: Option<String>,
    smtp_password: Option<String>,
    smtp_tls: bool,
    from_email: Option<String>,
    to_emails: Vec<String>,
    webhook_url: Option<String>,
    webhook_headers: Vec<String>,
    slack_webhook_url: Option<String>,
    slack_channel: Option<String>,
    slack_username: Option<String>,
}

impl TryFrom<NotificationChannelRow> for NotificationChannelConfig {
    type Error = crate::error::CoreError;

    fn try_from(row: NotificationChannelRow) -> std::result::Result<Self, Self::Error> {
        let kind = match row.kind.as_str() {
            "email" => NotificationChannelKind::Email,
            "webhook" => NotificationChannelKind::Webhook,
            "slack" => NotificationChannelKind::Slack,
            other => {
                return Err(crate::error::CoreError::Config(format!(
                    "unknown notification channel kind {other}"
                )))
            }
        };

        let webhook_headers = row
            .webhook_headers
            .into_iter()
            .map(|pair| match pair.split_once(':') {
                Some((k, v)) => (k.trim().to_string(), v.trim().to_string()),
                None => (pair.trim().to_string(), String::new()),
            })
            .collect();

        Ok(NotificationChannelConfig {
            kind,
            enabled: row.enabled,
            smtp_host: row.smtp_host,
            smtp_port: row.smtp_port.map(|p| p as u16),
            smtp_user: row.smtp_user,
            smtp_password: row.smtp_password,
            smtp_tls: row.smtp_tls,
            from_email: row.from_email,
            to_emails: row.to_emails,
            webhook_url: row.webhook_url,
            webhook_headers,
            slack_webhook_url: row.slack_webhook_url,
            slack_channel: row.slack_channel,
            slack_username: row.slack_username,
        })
    }
}
