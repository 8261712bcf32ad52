use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::{AlertConfigId, DeviceId};
use crate::notification::NotificationChannelKind;

/// Alert severity, independent of [`crate::ThreatSeverity`] (that enum
/// classifies appliance-reported threat logs; this one classifies
/// operator-defined threshold alerts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Cooldown window before the same (device, alert config) pair may fire
    /// again. All severities share 300s today — the Design Notes resolve
    /// the original's two conflicting cooldown sources (a per-severity table
    /// and a single global constant) in favor of the per-severity table,
    /// which happens to hold the same value for every row right now.
    pub fn cooldown(&self) -> Duration {
        match self {
            Self::Info => Duration::from_secs(300),
            Self::Warning => Duration::from_secs(300),
            Self::Critical => Duration::from_secs(300),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ComparisonOperator {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Equal,
    NotEqual,
}

impl ComparisonOperator {
    pub fn evaluate(&self, actual: f64, threshold: f64) -> bool {
        match self {
            Self::GreaterThan => actual > threshold,
            Self::GreaterThanOrEqual => actual >= threshold,
            Self::LessThan => actual < threshold,
            Self::LessThanOrEqual => actual <= threshold,
            Self::Equal => (actual - threshold).abs() < f64::EPSILON,
            Self::NotEqual => (actual - threshold).abs() >= f64::EPSILON,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
        }
    }
}

/// A threshold rule the Alert Engine evaluates against incoming samples.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlertConfig {
    pub id: AlertConfigId,
    pub device_id: Option<DeviceId>,
    pub metric_type: String,
    pub operator: ComparisonOperator,
    pub threshold_value: f64,
    pub severity: Severity,
    pub enabled: bool,
    /// Channels a firing of this config should dispatch to. Empty means no
    /// channel fires even if the channel itself is globally enabled.
    pub notification_channels: Vec<NotificationChannelKind>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A fired alert, persisted for audit and for rendering the alert history
/// view. Distinct from [`AlertCooldown`], which tracks only the next
/// eligible-to-fire time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlertHistory {
    pub id: i64,
    pub alert_config_id: AlertConfigId,
    pub device_id: DeviceId,
    pub triggered_at: DateTime<Utc>,
    pub actual_value: f64,
    pub message: String,
}

/// Tracks when a (device, alert config) pair may next fire. One row per
/// pair; `expires_at` is pushed forward on each fire by
/// `severity.cooldown()`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlertCooldown {
    pub device_id: DeviceId,
    pub alert_config_id: AlertConfigId,
    pub expires_at: DateTime<Utc>,
}

impl AlertCooldown {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}
