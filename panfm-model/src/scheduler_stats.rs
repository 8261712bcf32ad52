use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-job execution/error counters, flushed to `scheduler_stats_history`
/// once a minute by the Collector. Owned by the running `Scheduler` struct,
/// not a process-wide static.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchedulerStatsRow {
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: i64,
    pub total_executions: i64,
    pub total_errors: i64,
    pub last_execution: Option<DateTime<Utc>>,
    /// Per-job breakdown (`{"collect_throughput": {"executions": 12,
    /// "errors": 0, "last_run": "..."}}`), persisted as JSON since the job
    /// set is fixed at compile time but tooling reads this ad hoc.
    pub jobs: HashMap<String, Value>,
}
