//! Capability boundary between the Collector and a firewall appliance.
//!
//! [`FirewallClient`] is the one trait the rest of the core crate depends
//! on; [`crate::panos::PanOsClient`] (in `panfm-core`) is the only concrete
//! implementation, but tests substitute a `mockall`-generated mock instead
//! of standing up a real appliance.

pub mod client;
pub mod error;
pub mod types;

pub use client::FirewallClient;
pub use error::FirewallError;
pub use types::{
    ArpEntry, ContentUpdateInfo, DhcpLease, InterfaceStatus, LicenseInfo, ResourceUsage,
    SoftwareUpdateInfo, SystemInfo, TechSupportJobStatus,
};
