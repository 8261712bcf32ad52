use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::DeviceId;

/// A host observed on the LAN side of a firewall, sourced from the
/// appliance's ARP/DHCP tables. `vlan` is derived from `interface`
/// (`ethernet1/21.90` -> `"90"`, `"-"` when the interface carries no VLAN
/// suffix) rather than stored directly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConnectedDevice {
    pub time: DateTime<Utc>,
    pub device_id: DeviceId,
    pub ip: String,
    pub mac: Option<String>,
    pub hostname: Option<String>,
    pub interface: Option<String>,
    pub zone: Option<String>,
    pub ttl: Option<i32>,
    pub vendor: Option<String>,
    pub custom_name: Option<String>,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub bytes_sent: i64,
    pub bytes_received: i64,
    pub total_volume: i64,
}

impl ConnectedDevice {
    /// VLAN id embedded in `interface` (e.g. `ethernet1/21.90` -> `"90"`),
    /// or `"-"` for trunk/untagged interfaces. Computed, never stored.
    pub fn vlan(&self) -> &str {
        match &self.interface {
            Some(iface) => match iface.rsplit_once('.') {
                Some((_, vlan)) => vlan,
                None => "-",
            },
            None => "-",
        }
    }

    /// A MAC is only kept if it matches `xx:xx:xx:xx:xx:xx` (or `-`
    /// separated); appliances report `(incomplete)` for unresolved ARP
    /// entries, which must become `NULL` rather than a stored garbage value.
    pub fn normalize_mac(raw: Option<&str>) -> Option<String> {
        let raw = raw?;
        let is_valid = raw.len() == 17
            && raw
                .split(|c| c == ':' || c == '-')
                .all(|octet| octet.len() == 2 && octet.chars().all(|c| c.is_ascii_hexdigit()));
        is_valid.then(|| raw.to_string())
    }
}
