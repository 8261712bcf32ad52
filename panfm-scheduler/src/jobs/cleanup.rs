//! `database_cleanup`: runs once daily. Hypertable retention
//! (`throughput_samples`, `traffic_flows`, `threat_logs`, ...) is handled
//! declaratively by TimescaleDB retention policies set up in the
//! migrations, so this job is a thin app-managed sweep over the plain
//! relational tables those policies don't touch.

use chrono::Duration as ChronoDuration;
use tracing::info;

use crate::context::JobContext;

pub async fn run(ctx: &JobContext, retention_days: u32) -> panfm_core::error::Result<()> {
    let samples_removed = ctx.store.cleanup_old_samples(retention_days).await?;
    let requests_removed =
        ctx.store.cleanup_old_collection_requests(ChronoDuration::hours(1)).await?;

    info!(samples_removed, requests_removed, "database cleanup complete");
    Ok(())
}
