use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::Value;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::ids::DeviceId;

/// Threat log severity. `UrlFilter` is kept as its own variant (not folded
/// into `Low`) because the store exposes a dedicated accessor for it
/// (`get_url_filtering_logs`), mirroring a distinct PAN-OS log type rather
/// than a severity level proper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ThreatSeverity {
    Critical,
    High,
    Medium,
    Low,
    UrlFilter,
}

impl ThreatSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::UrlFilter => "url-filter",
        }
    }
}

impl fmt::Display for ThreatSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThreatSeverity {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            "url-filter" | "url_filter" | "urlfilter" => Ok(Self::UrlFilter),
            other => Err(ModelError::InvalidSeverity(other.to_string())),
        }
    }
}

/// One threat/URL-filtering log entry as reported by the appliance. The raw
/// PAN-OS log payload is retained in `log_data` alongside the fields hoisted
/// out for indexed querying.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThreatLog {
    pub time: DateTime<Utc>,
    pub device_id: DeviceId,
    pub severity: ThreatSeverity,
    pub threat: Option<String>,
    pub source_ip: Option<String>,
    pub destination_ip: Option<String>,
    pub application: Option<String>,
    pub action: Option<String>,
    pub rule: Option<String>,
    pub log_data: Value,
}
