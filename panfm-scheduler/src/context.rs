use std::sync::Arc;

use panfm_contracts::FirewallClient;
use panfm_core::alert::AlertEngine;
use panfm_core::notification::Notifier;
use panfm_core::PostgresStore;

/// Everything a job needs to run one tick, shared across the five spawned
/// tasks via `Arc`. Mirrors the handful of fields `FolderMonitor` closes
/// over, generalized from "one database + one filesystem" to "one store +
/// one firewall client + one notifier".
pub struct JobContext {
    pub store: PostgresStore,
    pub client: Arc<dyn FirewallClient>,
    pub notifier: Arc<dyn Notifier>,
    pub alert_engine: Arc<AlertEngine>,
    pub device_concurrency: usize,
}
