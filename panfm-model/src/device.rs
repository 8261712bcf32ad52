use crate::ids::DeviceId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A managed firewall appliance: enough to resolve a `FirewallClient` call
/// against it (address, credential reference) and to label it in the UI.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub ip: String,
    /// Opaque reference into the credential store; never the key itself.
    pub credential_ref: String,
    pub enabled: bool,
}

/// User-supplied annotation for a single (device, MAC) pair discovered via
/// ARP/connected-device polling. Distinct from [`crate::ConnectedDevice`],
/// which is a point-in-time observation; this is durable operator metadata.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceMetadata {
    pub device_id: DeviceId,
    pub mac: String,
    pub custom_name: Option<String>,
    pub location: Option<String>,
    pub comment: Option<String>,
    pub tags: Vec<String>,
}

impl DeviceMetadata {
    /// `ANY`/`OR` tag match: true if metadata carries at least one of `tags`.
    pub fn matches_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|t| self.tags.contains(t))
    }

    /// `ALL`/`AND` tag match: true if metadata carries every tag in `tags`.
    pub fn matches_all_tags(&self, tags: &[String]) -> bool {
        tags.iter().all(|t| self.tags.contains(t))
    }
}
