use std::fmt;

use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::{CollectionRequestId, DeviceId};

/// On-demand collection IPC: rows in `collection_requests` are the only
/// channel between the read-API process and the Collector process (they
/// otherwise share only the database). The web process inserts `queued`
/// rows; the Collector polls for them every 5s and transitions them through
/// `running` to `completed`/`failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CollectionRequestStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl CollectionRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CollectionRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollectionRequest {
    pub id: CollectionRequestId,
    pub device_id: DeviceId,
    pub status: CollectionRequestStatus,
    pub requested_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}
