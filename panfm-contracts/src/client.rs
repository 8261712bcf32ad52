use async_trait::async_trait;
use panfm_model::{ConnectedDevice, DeviceId, Sample, ThreatLog};

use crate::error::Result;
use crate::types::{
    ArpEntry, ContentUpdateInfo, DhcpLease, InterfaceStatus, LicenseInfo, ResourceUsage,
    SoftwareUpdateInfo, SystemInfo, TechSupportJobStatus,
};

/// Everything the Collector needs from a firewall appliance. Implementors
/// own the wire protocol (XML-over-HTTPS for `PanOsClient`, anything else
/// for a future appliance family) — callers never see XML, HTTP status
/// codes, or API keys, only typed results and [`crate::FirewallError`].
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait FirewallClient: Send + Sync {
    /// Combined hostname/uptime/version probe. Implementations may use a
    /// shorter timeout here than other calls (a healthy appliance answers
    /// in well under a second).
    async fn system_info(&self, device_id: DeviceId) -> Result<SystemInfo>;

    /// One throughput/session/CPU/disk snapshot, already normalized into
    /// the stored [`Sample`] shape.
    async fn throughput(&self, device_id: DeviceId) -> Result<Sample>;

    async fn resources(&self, device_id: DeviceId) -> Result<ResourceUsage>;

    async fn interfaces(&self, device_id: DeviceId) -> Result<Vec<InterfaceStatus>>;

    async fn threat_logs(&self, device_id: DeviceId, max: u32) -> Result<Vec<ThreatLog>>;

    async fn system_logs(&self, device_id: DeviceId, max: u32) -> Result<Vec<serde_json::Value>>;

    async fn traffic_logs(&self, device_id: DeviceId, max: u32) -> Result<Vec<serde_json::Value>>;

    async fn application_stats(
        &self,
        device_id: DeviceId,
        max: u32,
    ) -> Result<Vec<serde_json::Value>>;

    async fn arp_table(&self, device_id: DeviceId) -> Result<Vec<ArpEntry>>;

    async fn connected_devices(&self, device_id: DeviceId) -> Result<Vec<ConnectedDevice>>;

    async fn dhcp_leases(&self, device_id: DeviceId) -> Result<Vec<DhcpLease>>;

    async fn licenses(&self, device_id: DeviceId) -> Result<Vec<LicenseInfo>>;

    async fn software_updates(&self, device_id: DeviceId) -> Result<Vec<SoftwareUpdateInfo>>;

    async fn content_updates(&self, device_id: DeviceId) -> Result<Vec<ContentUpdateInfo>>;

    /// Kicks off tech-support-file generation; returns a job id to poll.
    async fn start_tech_support_job(&self, device_id: DeviceId) -> Result<String>;

    async fn tech_support_job_status(
        &self,
        device_id: DeviceId,
        job_id: &str,
    ) -> Result<TechSupportJobStatus>;
}
