use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::DeviceId;

/// A single source/destination/application traffic flow accumulated into
/// the `traffic_flows` hypertable. Per invariant 5, repeated observations of
/// the same (time bucket, device, source, dest, port, application) key
/// accumulate bytes/sessions rather than overwrite.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrafficFlow {
    pub time: DateTime<Utc>,
    pub device_id: DeviceId,
    pub source_ip: String,
    pub dest_ip: String,
    pub dest_port: Option<i32>,
    pub application: String,
    pub category: Option<String>,
    pub protocol: Option<String>,
    pub bytes_sent: i64,
    pub bytes_received: i64,
    pub bytes_total: i64,
    pub sessions: i64,
    pub source_zone: Option<String>,
    pub dest_zone: Option<String>,
    pub source_vlan: Option<String>,
    pub dest_vlan: Option<String>,
    pub source_hostname: Option<String>,
    pub dest_hostname: Option<String>,
}

impl TrafficFlow {
    /// `sessions` defaults to 1 when the appliance does not report a count,
    /// matching the collector's insert default.
    pub fn sessions_or_default(sessions: Option<i64>) -> i64 {
        sessions.unwrap_or(1)
    }
}

/// One row of `TrafficFlowsForClient`: flows from a single source IP,
/// summed over the query window and grouped by `(dest_ip, dest_port,
/// application)` for the Sankey view. Distinct from [`TrafficFlow`], which
/// is one un-aggregated accumulator row per time bucket.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AggregatedTrafficFlow {
    pub source_ip: String,
    pub dest_ip: String,
    pub dest_port: Option<i32>,
    pub application: String,
    pub bytes: i64,
    pub sessions: i64,
    pub category: Option<String>,
    pub protocol: Option<String>,
    pub dest_zone: Option<String>,
    pub dest_hostname: Option<String>,
}

/// One entry in a top-talker breakdown used to enrich an alert message:
/// source IP, its most recently observed hostname (if the appliance
/// reported one), and total bytes over the query window.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TopClientDetail {
    pub ip: String,
    pub hostname: Option<String>,
    pub bytes: i64,
}

/// Per-application byte/session counters for a collection tick.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ApplicationSample {
    pub time: DateTime<Utc>,
    pub device_id: DeviceId,
    pub application: String,
    pub category: Option<String>,
    pub bytes_total: i64,
    pub sessions: i64,
}

/// Bandwidth used by one traffic category (e.g. `general-internet`) within
/// one traffic direction (`lan`, `wan`, `internet`) for a collection tick.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CategoryBandwidth {
    pub time: DateTime<Utc>,
    pub device_id: DeviceId,
    pub category: String,
    pub traffic_type: String,
    pub bytes_total: i64,
}

/// Bandwidth used by one client IP within one traffic direction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClientBandwidth {
    pub time: DateTime<Utc>,
    pub device_id: DeviceId,
    pub client_ip: String,
    pub traffic_type: String,
    pub bytes_sent: i64,
    pub bytes_received: i64,
    pub bytes_total: i64,
}
