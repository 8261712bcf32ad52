use std::time::Duration;

use panfm_model::{AlertEvent, NotificationChannelConfig};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::json;

use crate::error::{CoreError, Result};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

fn payload(event: &AlertEvent) -> serde_json::Value {
    json!({
        "severity": event.severity.to_string(),
        "device_id": event.device_id.to_string(),
        "device_name": event.device_name,
        "metric_type": event.metric_type,
        "threshold_operator": event.threshold_operator.as_str(),
        "threshold_value": event.threshold_value,
        "actual_value": event.actual_value,
        "message": event.message,
        "timestamp": event.timestamp.to_rfc3339(),
    })
}

pub async fn send(config: &NotificationChannelConfig, event: &AlertEvent) -> Result<()> {
    post(config, payload(event)).await
}

pub async fn send_test(config: &NotificationChannelConfig) -> Result<()> {
    post(
        config,
        json!({ "message": "This is a test message from the PANfm alert engine." }),
    )
    .await
}

async fn post(config: &NotificationChannelConfig, body: serde_json::Value) -> Result<()> {
    let url = config
        .webhook_url
        .as_deref()
        .ok_or_else(|| CoreError::Notification("webhook channel enabled with no webhook_url".into()))?;

    let mut headers = HeaderMap::new();
    for (key, value) in &config.webhook_headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| CoreError::Notification(format!("invalid header name {key}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| CoreError::Notification(format!("invalid header value for {key}: {e}")))?;
        headers.insert(name, value);
    }

    let client = reqwest::Client::new();
    let response = client
        .post(url)
        .timeout(SEND_TIMEOUT)
        .headers(headers)
        .json(&body)
        .send()
        .await
        .map_err(|e| CoreError::Notification(format!("webhook request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(CoreError::Notification(format!(
            "webhook endpoint returned {}",
            response.status()
        )));
    }

    Ok(())
}
