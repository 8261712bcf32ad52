use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::DeviceId;

/// A window during which the Alert Engine suppresses notifications for a
/// device (planned outage, firmware upgrade). Distinct from a per-alert
/// cooldown: this suppresses every alert config for the device.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MaintenanceWindow {
    pub device_id: DeviceId,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub reason: Option<String>,
}

impl MaintenanceWindow {
    pub fn covers(&self, at: DateTime<Utc>) -> bool {
        at >= self.starts_at && at < self.ends_at
    }
}
