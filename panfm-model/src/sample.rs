use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::DeviceId;

/// Active session counts by transport protocol, plus capacity headroom.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Sessions {
    pub active: i64,
    pub tcp: i64,
    pub udp: i64,
    pub icmp: i64,
    pub max_capacity: i64,
    pub utilization_pct: f64,
}

/// Control-plane and data-plane CPU load, plus management-plane memory.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Cpu {
    pub data_plane_pct: f64,
    pub mgmt_plane_pct: f64,
    pub memory_used_pct: f64,
}

/// Percent-full of each appliance partition tracked for disk-pressure alerts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiskUsage {
    pub root_pct: f64,
    pub logs_pct: f64,
    pub var_pct: f64,
}

/// PAN-OS content/signature database versions, reported verbatim.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DatabaseVersions {
    pub app_version: Option<String>,
    pub threat_version: Option<String>,
    pub wildfire_version: Option<String>,
    pub url_version: Option<String>,
}

/// Whether the appliance's support license is active and/or expired.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct License {
    pub expired: bool,
    pub active: bool,
}

/// A single entry in a top-N breakdown (client address or application
/// category) paired with its measured byte volume for the sample window.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TopClient {
    pub ip: String,
    pub bytes_total: i64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TopCategory {
    pub category: String,
    pub bytes_total: i64,
}

/// One point-in-time throughput/health snapshot for a device. Mirrors the
/// `throughput_samples` hypertable row, with nested JSON fields promoted to
/// typed substructures instead of raw `serde_json::Value`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    pub time: DateTime<Utc>,
    pub device_id: DeviceId,

    pub inbound_mbps: f64,
    pub outbound_mbps: f64,
    pub total_mbps: f64,
    pub inbound_pps: f64,
    pub outbound_pps: f64,
    pub total_pps: f64,
    pub internal_mbps: f64,
    pub internet_mbps: f64,

    pub sessions: Sessions,
    pub cpu: Cpu,
    pub disk_usage: DiskUsage,
    pub database_versions: DatabaseVersions,
    pub license: License,

    pub top_bandwidth_client: Option<TopClient>,
    pub top_internal_client: Option<TopClient>,
    pub top_internet_client: Option<TopClient>,
    pub top_category_wan: Option<TopCategory>,
    pub top_category_lan: Option<TopCategory>,
    pub top_category_internet: Option<TopCategory>,

    pub wan_ip: Option<String>,
    pub wan_speed: Option<String>,
    pub hostname: Option<String>,
    pub uptime_seconds: Option<i64>,
    pub pan_os_version: Option<String>,

    pub threats_count: i64,
    pub interface_errors: i64,

    pub cpu_temp: Option<f64>,
    pub cpu_temp_max: Option<f64>,
    pub cpu_temp_alarm: bool,
}

impl Sample {
    /// Builds a [`Sample`] with every numeric field at its zero default and
    /// every optional field `None`, the single construction path every
    /// `FirewallClient` response decoder should use instead of hand-rolling
    /// per-field defaulting at each call site.
    pub fn new(device_id: DeviceId, time: DateTime<Utc>) -> Self {
        Self {
            time,
            device_id,
            inbound_mbps: 0.0,
            outbound_mbps: 0.0,
            total_mbps: 0.0,
            inbound_pps: 0.0,
            outbound_pps: 0.0,
            total_pps: 0.0,
            internal_mbps: 0.0,
            internet_mbps: 0.0,
            sessions: Sessions::default(),
            cpu: Cpu::default(),
            disk_usage: DiskUsage::default(),
            database_versions: DatabaseVersions::default(),
            license: License::default(),
            top_bandwidth_client: None,
            top_internal_client: None,
            top_internet_client: None,
            top_category_wan: None,
            top_category_lan: None,
            top_category_internet: None,
            wan_ip: None,
            wan_speed: None,
            hostname: None,
            uptime_seconds: None,
            pan_os_version: None,
            threats_count: 0,
            interface_errors: 0,
            cpu_temp: None,
            cpu_temp_max: None,
            cpu_temp_alarm: false,
        }
    }
}
