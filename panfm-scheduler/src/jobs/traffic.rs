//! `collect_traffic_flows`: a dedicated, fixed-60s-interval pass over the
//! fleet feeding the topology/Sankey view, independent of whatever cadence
//! `collect_throughput` is currently running at. Grounded in `clock.py`'s
//! `collect_traffic_flows` job, which calls its own
//! `collect_traffic_flows_for_device` rather than reusing the throughput
//! job's log collection.

use chrono::Utc;
use panfm_contracts::FirewallClient;
use panfm_model::Device;
use tracing::debug;

use crate::context::JobContext;
use crate::normalize;

pub async fn run(ctx: &JobContext) -> panfm_core::error::Result<()> {
    let devices = ctx.store.list_devices(true).await?;
    if devices.is_empty() {
        debug!("no enabled devices, skipping traffic flow collection");
        return Ok(());
    }

    super::for_each_device(ctx, devices, "collect_traffic_flows", |device| {
        collect_one(ctx, device)
    })
    .await;

    Ok(())
}

async fn collect_one(ctx: &JobContext, device: Device) -> panfm_core::error::Result<()> {
    let raw = ctx.client.traffic_logs(device.id, 500).await?;
    let now = Utc::now();
    let flows = normalize::entries_to_traffic_flows(device.id, &raw, now);
    if flows.is_empty() {
        return Ok(());
    }

    ctx.store.insert_traffic_flows(device.id, &flows).await?;
    Ok(())
}
