use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::alert::{ComparisonOperator, Severity};
use crate::ids::{AlertConfigId, DeviceId};

/// A fired alert in the shape the Notification Dispatcher renders into
/// channel-specific messages. A typed analogue of `notification_manager.py`'s
/// `alert_data` dict: same fields, same names, no stringly-typed payload.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlertEvent {
    pub alert_config_id: AlertConfigId,
    pub severity: Severity,
    pub metric_type: String,
    pub threshold_value: f64,
    pub threshold_operator: ComparisonOperator,
    pub actual_value: f64,
    pub message: String,
    pub device_name: String,
    pub device_id: DeviceId,
    pub timestamp: DateTime<Utc>,
    /// Channels the firing config was configured to dispatch to; the
    /// dispatcher sends only to these, not every globally enabled channel.
    pub notification_channels: Vec<NotificationChannelKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NotificationChannelKind {
    Email,
    Webhook,
    Slack,
}

/// Dispatch configuration for one channel. The Notification Dispatcher loads
/// this from the `notification_channel` table first and falls back to
/// per-channel environment variables when no row exists, matching
/// `notification_manager.py`'s `_load_*_config` layering.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NotificationChannelConfig {
    pub kind: NotificationChannelKind,
    pub enabled: bool,

    // Email (SMTP)
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_tls: bool,
    pub from_email: Option<String>,
    pub to_emails: Vec<String>,

    // Webhook
    pub webhook_url: Option<String>,
    pub webhook_headers: Vec<(String, String)>,

    // Slack
    pub slack_webhook_url: Option<String>,
    pub slack_channel: Option<String>,
    pub slack_username: Option<String>,
}

impl NotificationChannelConfig {
    pub fn disabled(kind: NotificationChannelKind) -> Self {
        Self {
            kind,
            enabled: false,
            smtp_host: None,
            smtp_port: None,
            smtp_user: None,
            smtp_password: None,
            smtp_tls: true,
            from_email: None,
            to_emails: Vec::new(),
            webhook_url: None,
            webhook_headers: Vec::new(),
            slack_webhook_url: None,
            slack_channel: None,
            slack_username: None,
        }
    }
}

/// Per-channel send outcome, mirroring the original's `results` dict
/// (`{enabled, sent, error}`) for each of email/webhook/slack.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DispatchOutcome {
    pub channel: NotificationChannelKind,
    pub enabled: bool,
    pub sent: bool,
    pub error: Option<String>,
}
