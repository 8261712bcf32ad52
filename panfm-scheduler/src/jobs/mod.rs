mod cleanup;
mod connected_devices;
mod throughput;
mod traffic;

pub use cleanup::run as database_cleanup;
pub use connected_devices::run as collect_connected_devices;
pub use throughput::{collect_device, run as collect_throughput};
pub use traffic::run as collect_traffic_flows;

use std::future::Future;

use futures::stream::{self, StreamExt};
use panfm_model::Device;
use tracing::error;

use crate::context::JobContext;

/// Runs `f` once per device, at most `ctx.device_concurrency` at a time.
/// One device's failure is logged and skipped, matching
/// `run_inventory_cycle`'s per-library error handling — a broken
/// appliance never stalls the rest of the fleet's tick.
pub async fn for_each_device<F, Fut>(ctx: &JobContext, devices: Vec<Device>, job: &str, f: F)
where
    F: Fn(Device) -> Fut,
    Fut: Future<Output = panfm_core::error::Result<()>>,
{
    stream::iter(devices)
        .for_each_concurrent(ctx.device_concurrency, |device| {
            let device_name = device.name.clone();
            let fut = f(device);
            async move {
                if let Err(e) = fut.await {
                    error!(job, device = %device_name, error = %e, "device collection failed");
                }
            }
        })
        .await;
}
