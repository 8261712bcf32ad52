use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Response to the combined uptime+version probe (`<show><system><info/>
/// </system></show>`). The original collapsed two API calls into one for
/// this exact reason; this client makes the same call.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SystemInfo {
    pub hostname: Option<String>,
    pub uptime: Option<String>,
    pub sw_version: Option<String>,
    pub serial: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResourceUsage {
    pub data_plane_cpu_pct: Option<f64>,
    pub mgmt_plane_cpu_pct: Option<f64>,
    pub memory_used_pct: Option<f64>,
    pub disk_root_pct: Option<f64>,
    pub disk_logs_pct: Option<f64>,
    pub disk_var_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterfaceStatus {
    pub name: String,
    pub zone: Option<String>,
    pub state: Option<String>,
    pub speed: Option<String>,
    pub errors: i64,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArpEntry {
    pub ip: String,
    pub mac: Option<String>,
    pub interface: Option<String>,
    pub ttl: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DhcpLease {
    pub ip: String,
    pub mac: Option<String>,
    pub hostname: Option<String>,
    pub expiry: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LicenseInfo {
    pub feature: String,
    pub expired: bool,
    pub expiry_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoftwareUpdateInfo {
    pub version: String,
    pub downloaded: bool,
    pub current: bool,
    pub release_notes_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContentUpdateInfo {
    pub version: String,
    pub content_type: String,
    pub downloaded: bool,
    pub current: bool,
}

/// Status of a long-running tech-support-file generation job, polled until
/// it reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TechSupportJobStatus {
    pub job_id: String,
    pub finished: bool,
    pub download_url: Option<String>,
}
