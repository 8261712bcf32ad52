use std::time::Duration;

use panfm_model::{AlertEvent, NotificationChannelConfig, Severity};
use serde_json::json;

use crate::error::{CoreError, Result};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Slack's color-coded attachment sidebar, keyed off alert severity.
fn color_for(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "#2196f3",
        Severity::Warning => "#ff9800",
        Severity::Critical => "#f44336",
    }
}

fn payload(event: &AlertEvent, channel: Option<&str>, username: Option<&str>) -> serde_json::Value {
    let mut body = json!({
        "attachments": [{
            "color": color_for(event.severity),
            "title": format!("{} alert on {}", event.severity, event.device_name),
            "text": event.message,
            "fields": [
                {"title": "Metric", "value": event.metric_type, "short": true},
                {"title": "Threshold", "value": format!("{} {}", event.threshold_operator.as_str(), event.threshold_value), "short": true},
                {"title": "Actual", "value": event.actual_value.to_string(), "short": true},
                {"title": "Device", "value": event.device_name, "short": true},
            ],
            "ts": event.timestamp.timestamp(),
        }]
    });
    if let Some(channel) = channel {
        body["channel"] = json!(channel);
    }
    if let Some(username) = username {
        body["username"] = json!(username);
    }
    body
}

pub async fn send(config: &NotificationChannelConfig, event: &AlertEvent) -> Result<()> {
    let url = config
        .slack_webhook_url
        .as_deref()
        .ok_or_else(|| CoreError::Notification("slack channel enabled with no slack_webhook_url".into()))?;

    let body = payload(event, config.slack_channel.as_deref(), config.slack_username.as_deref());
    post(url, body).await
}

pub async fn send_test(config: &NotificationChannelConfig) -> Result<()> {
    let url = config
        .slack_webhook_url
        .as_deref()
        .ok_or_else(|| CoreError::Notification("slack channel enabled with no slack_webhook_url".into()))?;

    let mut body = json!({ "text": "This is a test message from the PANfm alert engine." });
    if let Some(channel) = &config.slack_channel {
        body["channel"] = json!(channel);
    }
    post(url, body).await
}

async fn post(url: &str, body: serde_json::Value) -> Result<()> {
    let client = reqwest::Client::new();
    let response = client
        .post(url)
        .timeout(SEND_TIMEOUT)
        .json(&body)
        .send()
        .await
        .map_err(|e| CoreError::Notification(format!("slack request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(CoreError::Notification(format!(
            "slack webhook returned {}",
            response.status()
        )));
    }

    Ok(())
}
