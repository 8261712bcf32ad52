//! Concrete `FirewallClient` over PAN-OS's XML-over-HTTPS management API.

mod client;
mod retry;
mod xml;

pub use client::{DeviceDirectory, PanOsClient, ResolvedDevice};
