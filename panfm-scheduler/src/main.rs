//! Collector process entry point: loads configuration, connects to the
//! store, wires the PAN-OS client and alert/notification stack, then hands
//! off to [`Scheduler::run`] until a shutdown signal arrives.

mod context;
mod jobs;
mod normalize;
mod scheduler;
mod stats;

use std::sync::Arc;

use clap::Parser;
use panfm_config::SchedulerConfig;
use panfm_core::alert::AlertEngine;
use panfm_core::notification::NotificationDispatcher;
use panfm_core::panos::PanOsClient;
use panfm_core::{EnvCredentialDirectory, PostgresStore};
use panfm_contracts::FirewallClient;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::context::JobContext;
use crate::scheduler::Scheduler;

/// Command line arguments for the PANfm Collector.
#[derive(Parser, Debug)]
#[command(name = "panfm-scheduler")]
#[command(about = "Polls the firewall fleet on an interval and persists samples to the time-series store")]
struct Args {
    /// Run the startup checks and exit without entering the job loop.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "panfm_scheduler=info,panfm_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SchedulerConfig::from_env();
    info!(
        refresh_interval_secs = config.refresh_interval.as_secs(),
        device_concurrency = config.device_concurrency,
        retention_days = config.retention_days,
        "scheduler configuration loaded"
    );

    let store = PostgresStore::connect(&config.database).await?;
    store.run_migrations().await?;
    store.preflight_check().await?;
    info!("database connected and migrated");

    if args.check {
        info!("startup check passed, exiting");
        return Ok(());
    }

    let directory = Arc::new(EnvCredentialDirectory::new(store.clone()));
    let client: Arc<dyn FirewallClient> = Arc::new(PanOsClient::new(directory));
    let notifier = Arc::new(NotificationDispatcher::new(store.clone()));
    let alert_engine = Arc::new(AlertEngine::new(store.clone()));

    let ctx = JobContext {
        store,
        client,
        notifier,
        alert_engine,
        device_concurrency: config.device_concurrency,
    };

    let scheduler = Scheduler::new(ctx, config);
    scheduler.run().await;
    info!("scheduler exited cleanly");
    Ok(())
}
