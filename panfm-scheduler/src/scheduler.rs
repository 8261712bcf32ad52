//! The Collector's top-level task: five `tokio::spawn`ed loops sharing one
//! [`JobContext`], started from `run(self: Arc<Self>)` and torn down
//! together on shutdown. The spawn/join/abort shape follows
//! `ferrex-core/src/scanner/background.rs`'s `BackgroundScanner::run`; the
//! per-loop "check the flag before starting the next tick" pattern follows
//! `FolderMonitor::start`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use panfm_config::SchedulerConfig;
use panfm_model::CollectionRequestStatus;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::context::JobContext;
use crate::jobs;
use crate::stats::SchedulerStats;

const SHUTDOWN_DRAIN: Duration = Duration::from_secs(30);
const SCHEDULER_STATS_RETENTION_DAYS: i64 = 30;

pub struct Scheduler {
    ctx: JobContext,
    stats: Arc<SchedulerStats>,
    config: SchedulerConfig,
    shutdown: Arc<AtomicBool>,
}

impl Scheduler {
    pub fn new(ctx: JobContext, config: SchedulerConfig) -> Arc<Self> {
        Arc::new(Self { ctx, stats: Arc::new(SchedulerStats::new()), config, shutdown: Arc::new(AtomicBool::new(false)) })
    }

    /// Runs every spawned job loop until a shutdown signal arrives, then
    /// gives in-flight work up to 30s to finish before aborting stragglers.
    pub async fn run(self: Arc<Self>) {
        let collection_enabled = self.config.collection_enabled;

        if collection_enabled {
            info!("running initial pre-collection pass before entering the interval loop");
            self.run_job("collect_throughput", jobs::collect_throughput(&self.ctx)).await;
            self.run_job("collect_connected_devices", jobs::collect_connected_devices(&self.ctx)).await;
        }

        let (refresh_tx, refresh_rx) = watch::channel(self.config.refresh_interval);

        let throughput = tokio::spawn({
            let scheduler = self.clone();
            let refresh_rx = refresh_rx.clone();
            async move { scheduler.interval_loop("collect_throughput", refresh_rx, collection_enabled, jobs::collect_throughput).await }
        });

        let connected_devices = tokio::spawn({
            let scheduler = self.clone();
            let refresh_rx = refresh_rx.clone();
            async move { scheduler.interval_loop("collect_connected_devices", refresh_rx, collection_enabled, jobs::collect_connected_devices).await }
        });

        let traffic_flows = tokio::spawn({
            let scheduler = self.clone();
            let period = self.config.traffic_flows_interval;
            async move { scheduler.fixed_interval_loop("collect_traffic_flows", period, collection_enabled, jobs::collect_traffic_flows).await }
        });

        let cleanup = tokio::spawn({
            let scheduler = self.clone();
            async move { scheduler.cleanup_loop().await }
        });

        let stats_task = tokio::spawn({
            let scheduler = self.clone();
            async move { scheduler.stats_loop(refresh_tx).await }
        });

        let collection_requests = tokio::spawn({
            let scheduler = self.clone();
            async move { scheduler.collection_requests_loop().await }
        });

        wait_for_shutdown_signal().await;
        info!("shutdown signal received, stopping new job triggers");
        self.shutdown.store(true, Ordering::SeqCst);

        let handles = vec![throughput, connected_devices, traffic_flows, cleanup, stats_task, collection_requests];
        let drain = tokio::time::timeout(SHUTDOWN_DRAIN, futures::future::join_all(handles)).await;

        match drain {
            Ok(_) => info!("all scheduler tasks drained cleanly"),
            Err(_) => {
                error!("scheduler tasks did not drain within {:?}, forcing shutdown", SHUTDOWN_DRAIN);
                std::process::exit(1);
            }
        }
    }

    fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    async fn run_job<F>(&self, name: &str, fut: F)
    where
        F: std::future::Future<Output = panfm_core::error::Result<()>>,
    {
        match fut.await {
            Ok(()) => self.stats.record_success(name),
            Err(e) => {
                self.stats.record_error(name, &e.to_string());
                error!(job = name, error = %e, "job tick failed");
            }
        }
    }

    /// Drives a job on `refresh_interval`, reacting immediately when
    /// `persist_scheduler_stats` pushes a new value instead of waiting for
    /// the interval to naturally elapse first.
    async fn interval_loop<F, Fut>(
        self: Arc<Self>,
        name: &'static str,
        mut refresh_rx: watch::Receiver<Duration>,
        enabled: bool,
        job: F,
    ) where
        F: Fn(&JobContext) -> Fut,
        Fut: std::future::Future<Output = panfm_core::error::Result<()>>,
    {
        if !enabled {
            debug!(job = name, "collection disabled, loop idle");
            return;
        }

        let mut ticker = interval(*refresh_rx.borrow());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.is_shutting_down() {
                        break;
                    }
                    self.run_job(name, job(&self.ctx)).await;
                }
                Ok(()) = refresh_rx.changed() => {
                    let new_interval = *refresh_rx.borrow();
                    info!(job = name, seconds = new_interval.as_secs(), "refresh interval reconfigured");
                    ticker = interval(new_interval);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                }
            }
        }
    }

    async fn fixed_interval_loop<F, Fut>(self: Arc<Self>, name: &'static str, period: Duration, enabled: bool, job: F)
    where
        F: Fn(&JobContext) -> Fut,
        Fut: std::future::Future<Output = panfm_core::error::Result<()>>,
    {
        if !enabled {
            return;
        }

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if self.is_shutting_down() {
                break;
            }
            self.run_job(name, job(&self.ctx)).await;
        }
    }

    /// Waits until the next 02:00 UTC, then ticks every
    /// `cleanup_interval` (nominally 24h) after that.
    async fn cleanup_loop(self: Arc<Self>) {
        tokio::time::sleep(duration_until_next_2am_utc()).await;

        let mut ticker = interval(self.config.cleanup_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            if self.is_shutting_down() {
                break;
            }
            self.run_job("database_cleanup", jobs::database_cleanup(&self.ctx, self.config.retention_days)).await;
            ticker.tick().await;
        }
    }

    /// `persist_scheduler_stats`: flushes the in-memory counters, sweeps
    /// old history rows unconditionally (REDESIGN FLAGS), and re-reads the
    /// admin-tunable refresh interval, pushing it to the other loops when
    /// it changed.
    async fn stats_loop(self: Arc<Self>, refresh_tx: watch::Sender<Duration>) {
        let mut ticker = interval(self.config.stats_flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if self.is_shutting_down() {
                break;
            }

            let snapshot = self.stats.snapshot();
            if let Err(e) = self.ctx.store.insert_scheduler_stats(&snapshot).await {
                error!(error = %e, "failed to persist scheduler stats");
            }

            if let Err(e) = self
                .ctx
                .store
                .cleanup_old_scheduler_stats(chrono::Duration::days(SCHEDULER_STATS_RETENTION_DAYS))
                .await
            {
                error!(error = %e, "failed to clean up old scheduler stats");
            }

            match self.ctx.store.get_refresh_interval().await {
                Ok(new_interval) if new_interval != *refresh_tx.borrow() => {
                    let _ = refresh_tx.send(new_interval);
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "failed to read refresh interval setting"),
            }
        }
    }

    /// Polls `collection_requests` for on-demand "collect now" triggers
    /// every 5s and runs that one device's throughput tick inline.
    async fn collection_requests_loop(self: Arc<Self>) {
        let mut ticker = interval(self.config.collection_request_poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if self.is_shutting_down() {
                break;
            }

            let pending = match self.ctx.store.get_pending_collection_requests().await {
                Ok(pending) => pending,
                Err(e) => {
                    error!(error = %e, "failed to poll collection requests");
                    continue;
                }
            };

            for request in pending {
                debug_assert_eq!(request.status, CollectionRequestStatus::Queued);

                if let Err(e) = self.ctx.store.mark_collection_request_running(request.id).await {
                    error!(error = %e, "failed to mark collection request running");
                    continue;
                }

                let device = match self.ctx.store.get_device(request.device_id).await {
                    Ok(Some(device)) => device,
                    Ok(None) => {
                        let _ = self
                            .ctx
                            .store
                            .mark_collection_request_failed(request.id, "device not found")
                            .await;
                        continue;
                    }
                    Err(e) => {
                        let _ = self.ctx.store.mark_collection_request_failed(request.id, &e.to_string()).await;
                        continue;
                    }
                };

                match jobs::collect_device(&self.ctx, device).await {
                    Ok(()) => {
                        let _ = self.ctx.store.mark_collection_request_completed(request.id).await;
                    }
                    Err(e) => {
                        let _ = self.ctx.store.mark_collection_request_failed(request.id, &e.to_string()).await;
                    }
                }
            }
        }
    }
}

fn duration_until_next_2am_utc() -> Duration {
    duration_until_2am_utc_from(chrono::Utc::now())
}

fn duration_until_2am_utc_from(now: chrono::DateTime<chrono::Utc>) -> Duration {
    use chrono::{NaiveTime, TimeZone, Utc};

    let today_2am = Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::from_hms_opt(2, 0, 0).unwrap()));
    let next = if now < today_2am { today_2am } else { today_2am + chrono::Duration::days(1) };

    (next - now).to_std().unwrap_or(Duration::from_secs(1))
}

#[cfg(test)]
mod cleanup_schedule_tests {
    use chrono::{TimeZone, Utc};

    use super::duration_until_2am_utc_from;

    #[test]
    fn before_2am_waits_until_today() {
        let now = Utc.with_ymd_and_hms(2026, 3, 5, 1, 0, 0).unwrap();
        let wait = duration_until_2am_utc_from(now);
        assert_eq!(wait.as_secs(), 3600);
    }

    #[test]
    fn after_2am_waits_until_tomorrow() {
        let now = Utc.with_ymd_and_hms(2026, 3, 5, 2, 30, 0).unwrap();
        let wait = duration_until_2am_utc_from(now);
        assert_eq!(wait.as_secs(), 23 * 3600 + 30 * 60);
    }

    #[test]
    fn exactly_2am_waits_a_full_day() {
        let now = Utc.with_ymd_and_hms(2026, 3, 5, 2, 0, 0).unwrap();
        let wait = duration_until_2am_utc_from(now);
        assert_eq!(wait.as_secs(), 24 * 3600);
    }
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
