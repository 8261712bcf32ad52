//! Shared data model for PANfm: device identity, time-series samples, threat
//! and traffic records, alert configuration, and notification channel shapes.

pub mod alert;
pub mod collection_request;
pub mod connected_device;
pub mod device;
pub mod error;
pub mod ids;
pub mod maintenance;
pub mod notification;
pub mod sample;
pub mod scheduler_stats;
pub mod threat;
pub mod traffic;

pub use alert::{AlertConfig, AlertCooldown, AlertHistory, ComparisonOperator, Severity};
pub use collection_request::{CollectionRequest, CollectionRequestStatus};
pub use connected_device::ConnectedDevice;
pub use device::{Device, DeviceMetadata};
pub use error::{ModelError, Result};
pub use ids::{AlertConfigId, CollectionRequestId, DeviceId};
pub use maintenance::MaintenanceWindow;
pub use notification::{
    AlertEvent, DispatchOutcome, NotificationChannelConfig, NotificationChannelKind,
};
pub use sample::{
    Cpu, DatabaseVersions, DiskUsage, License, Sample, Sessions, TopCategory, TopClient,
};
pub use scheduler_stats::SchedulerStatsRow;
pub use threat::{ThreatLog, ThreatSeverity};
pub use traffic::{
    AggregatedTrafficFlow, ApplicationSample, CategoryBandwidth, ClientBandwidth, TopClientDetail,
    TrafficFlow,
};
