//! `collect_connected_devices`: one ARP/DHCP snapshot per enabled device,
//! on the same cadence as `collect_throughput`. Grounded in `clock.py`'s
//! `collect_connected_devices` job.

use panfm_contracts::FirewallClient;
use panfm_model::Device;
use tracing::debug;

use crate::context::JobContext;

pub async fn run(ctx: &JobContext) -> panfm_core::error::Result<()> {
    let devices = ctx.store.list_devices(true).await?;
    if devices.is_empty() {
        debug!("no enabled devices, skipping connected device collection");
        return Ok(());
    }

    super::for_each_device(ctx, devices, "collect_connected_devices", |device| {
        collect_one(ctx, device)
    })
    .await;

    Ok(())
}

async fn collect_one(ctx: &JobContext, device: Device) -> panfm_core::error::Result<()> {
    let connected = ctx.client.connected_devices(device.id).await?;
    if connected.is_empty() {
        return Ok(());
    }
    ctx.store.insert_connected_devices(device.id, &connected).await?;
    Ok(())
}
