//! In-memory counters behind the `persist_scheduler_stats` job, owned by
//! the running [`crate::scheduler::Scheduler`] instead of the module-level
//! globals `clock.py` kept them in (REDESIGN FLAGS).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use chrono::{DateTime, Utc};
use panfm_model::SchedulerStatsRow;
use serde_json::{json, Value};

#[derive(Debug, Default, Clone)]
struct JobStats {
    executions: i64,
    errors: i64,
    last_run: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl JobStats {
    fn to_json(&self) -> Value {
        json!({
            "executions": self.executions,
            "errors": self.errors,
            "last_run": self.last_run,
            "last_error": self.last_error,
        })
    }
}

pub struct SchedulerStats {
    started_at: Instant,
    jobs: Mutex<HashMap<String, JobStats>>,
}

impl SchedulerStats {
    pub fn new() -> Self {
        Self { started_at: Instant::now(), jobs: Mutex::new(HashMap::new()) }
    }

    pub fn record_success(&self, job: &str) {
        let mut jobs = self.jobs.lock().expect("scheduler stats lock poisoned");
        let entry = jobs.entry(job.to_string()).or_default();
        entry.executions += 1;
        entry.last_run = Some(Utc::now());
    }

    pub fn record_error(&self, job: &str, error: &str) {
        let mut jobs = self.jobs.lock().expect("scheduler stats lock poisoned");
        let entry = jobs.entry(job.to_string()).or_default();
        entry.executions += 1;
        entry.errors += 1;
        entry.last_run = Some(Utc::now());
        entry.last_error = Some(error.to_string());
    }

    pub fn snapshot(&self) -> SchedulerStatsRow {
        let jobs = self.jobs.lock().expect("scheduler stats lock poisoned");
        let total_executions = jobs.values().map(|j| j.executions).sum();
        let total_errors = jobs.values().map(|j| j.errors).sum();
        let last_execution = jobs.values().filter_map(|j| j.last_run).max();
        let job_json: HashMap<String, Value> =
            jobs.iter().map(|(name, stats)| (name.clone(), stats.to_json())).collect();

        SchedulerStatsRow {
            timestamp: Utc::now(),
            uptime_seconds: self.started_at.elapsed().as_secs() as i64,
            total_executions,
            total_errors,
            last_execution,
            jobs: job_json,
        }
    }
}

impl Default for SchedulerStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_sums_across_jobs() {
        let stats = SchedulerStats::new();
        stats.record_success("collect_throughput");
        stats.record_success("collect_throughput");
        stats.record_error("collect_traffic_flows", "timeout");

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_executions, 3);
        assert_eq!(snapshot.total_errors, 1);
        assert_eq!(snapshot.jobs.len(), 2);
    }
}
