//! `collect_throughput`: the full per-device metrics + logs + alert
//! evaluation tick (spec step 2). Grounded in `throughput_collector.py`'s
//! `collect_all_devices`, `_compute_top_bandwidth_client` and
//! `_compute_top_categories` — those read back already-stored aggregates
//! rather than the fresh batch, so this does the same: traffic flows are
//! written first, then the Sample's derived fields are filled from the
//! store's last-60-minute view.

use chrono::{Duration as ChronoDuration, Utc};
use panfm_contracts::FirewallClient;
use panfm_model::{Device, Sample, TopCategory, TopClient};
use tracing::debug;

use crate::context::JobContext;
use crate::normalize;

fn top_window() -> ChronoDuration {
    ChronoDuration::minutes(60)
}

pub async fn run(ctx: &JobContext) -> panfm_core::error::Result<()> {
    let devices = ctx.store.list_devices(true).await?;
    if devices.is_empty() {
        debug!("no enabled devices, skipping throughput collection");
        return Ok(());
    }

    super::for_each_device(ctx, devices, "collect_throughput", |device| {
        collect_one(ctx, device)
    })
    .await;

    Ok(())
}

/// Runs one device's tick outside the fleet-wide fan-out, for the
/// on-demand `collection_requests` poller.
pub async fn collect_device(ctx: &JobContext, device: Device) -> panfm_core::error::Result<()> {
    collect_one(ctx, device).await
}

async fn collect_one(ctx: &JobContext, device: Device) -> panfm_core::error::Result<()> {
    let mut sample = ctx.client.throughput(device.id).await?;

    let interfaces = ctx.client.interfaces(device.id).await?;
    sample.interface_errors = interfaces.iter().map(|i| i.errors).sum();
    if let Some(wan) = interfaces.iter().find(|i| {
        i.zone.as_deref().map(|z| z.eq_ignore_ascii_case("wan")).unwrap_or(false)
    }) {
        sample.wan_speed = wan.speed.clone();
    }

    let threats = ctx.client.threat_logs(device.id, 50).await?;
    sample.threats_count = threats.len() as i64;
    if !threats.is_empty() {
        ctx.store.insert_threat_logs(device.id, &threats).await?;
    }

    let raw_traffic = ctx.client.traffic_logs(device.id, 500).await?;
    let now = Utc::now();
    let flows = normalize::entries_to_traffic_flows(device.id, &raw_traffic, now);
    if !flows.is_empty() {
        ctx.store.insert_traffic_flows(device.id, &flows).await?;

        let apps = normalize::flows_to_application_samples(device.id, &flows, now);
        ctx.store.insert_application_samples(device.id, &apps).await?;

        let categories = normalize::flows_to_category_bandwidth(device.id, &flows, now);
        ctx.store.insert_category_bandwidth(device.id, &categories).await?;

        let clients = normalize::flows_to_client_bandwidth(device.id, &flows, now);
        ctx.store.insert_client_bandwidth(device.id, &clients).await?;
    }

    fill_top_clients(ctx, &mut sample, device.id).await?;
    fill_top_categories(ctx, &mut sample, device.id).await?;

    ctx.store.insert_sample(&sample).await?;
    ctx.alert_engine.evaluate(device.id, &device.name, &sample, ctx.notifier.as_ref()).await?;

    Ok(())
}

async fn fill_top_clients(
    ctx: &JobContext,
    sample: &mut Sample,
    device_id: panfm_model::DeviceId,
) -> panfm_core::error::Result<()> {
    let internal = ctx.store.get_top_client(device_id, "internal", top_window()).await?;
    let internet = ctx.store.get_top_client(device_id, "internet", top_window()).await?;

    sample.top_internal_client = internal.clone().map(|(ip, bytes_total)| TopClient { ip, bytes_total });
    sample.top_internet_client = internet.clone().map(|(ip, bytes_total)| TopClient { ip, bytes_total });
    // Backward-compatible "overall top client": internet traffic wins when
    // present, falling back to the internal-only client, matching
    // `_compute_top_bandwidth_client`'s `top_internet or top_internal`.
    sample.top_bandwidth_client = internet
        .map(|(ip, bytes_total)| TopClient { ip, bytes_total })
        .or(sample.top_internal_client.clone());

    Ok(())
}

async fn fill_top_categories(
    ctx: &JobContext,
    sample: &mut Sample,
    device_id: panfm_model::DeviceId,
) -> panfm_core::error::Result<()> {
    let lan = ctx.store.get_top_category(device_id, "internal", top_window()).await?;
    let internet = ctx.store.get_top_category(device_id, "internet", top_window()).await?;

    sample.top_category_lan = lan.map(|(category, bytes_total)| TopCategory { category, bytes_total });
    sample.top_category_internet =
        internet.clone().map(|(category, bytes_total)| TopCategory { category, bytes_total });
    // No separate WAN-only breakdown is tracked; internet-bound traffic is
    // the WAN figure in this model.
    sample.top_category_wan =
        internet.map(|(category, bytes_total)| TopCategory { category, bytes_total });

    Ok(())
}
