use chrono::Utc;
use panfm_model::{AlertConfig, AlertEvent, AlertHistory, DeviceId, Sample};
use tracing::{debug, info};

use crate::alert::metric_bag;
use crate::error::Result;
use crate::notification::Notifier;
use crate::store::PostgresStore;

/// Metric types enriched with a per-IP top-talker breakdown before
/// dispatch, per spec: "for metrics of type 'bandwidth per source'".
const PER_SOURCE_METRICS: &[&str] = &["throughput_in", "throughput_out", "throughput_total"];

pub struct AlertEngine {
    store: PostgresStore,
}

impl AlertEngine {
    pub fn new(store: PostgresStore) -> Self {
        Self { store }
    }

    /// Evaluates every enabled [`AlertConfig`] row (global or scoped to
    /// `device_id`) against `sample`, dispatching through `notifier` for
    /// each config that fires and isn't cooling down. Returns the count of
    /// configs that actually dispatched (cooldown-suppressed fires don't
    /// count, matching the spec's "count of dispatched alerts").
    pub async fn evaluate(
        &self,
        device_id: DeviceId,
        device_name: &str,
        sample: &Sample,
        notifier: &dyn Notifier,
    ) -> Result<usize> {
        if self.store.in_maintenance_window(device_id, sample.time).await? {
            debug!(device_id = %device_id, "alert evaluation suppressed by maintenance window");
            return Ok(0);
        }

        let bag = metric_bag(sample);
        let configs = self.store.list_alert_configs(true).await?;
        let mut dispatched = 0;

        for config in configs {
            if let Some(scope) = config.device_id {
                if scope != device_id {
                    continue;
                }
            }

            let Some(&actual) = bag.get(config.metric_type.as_str()) else {
                continue;
            };

            if !config.operator.evaluate(actual, config.threshold_value) {
                continue;
            }

            if self.fire(device_id, device_name, sample, &config, actual, notifier).await? {
                dispatched += 1;
            }
        }

        Ok(dispatched)
    }

    /// Handles one triggered config: cooldown check, history write,
    /// cooldown upsert, dispatch. Returns whether a notification was
    /// actually sent (false on cooldown suppression).
    async fn fire(
        &self,
        device_id: DeviceId,
        device_name: &str,
        sample: &Sample,
        config: &AlertConfig,
        actual: f64,
        notifier: &dyn Notifier,
    ) -> Result<bool> {
        let now = Utc::now();
        let message = self.format_message(device_id, device_name, config, actual).await?;

        if let Some(cooldown) = self.store.get_cooldown(device_id, config.id).await? {
            if cooldown.is_active(now) {
                self.store
                    .insert_alert_history(&AlertHistory {
                        id: 0,
                        alert_config_id: config.id,
                        device_id,
                        triggered_at: now,
                        actual_value: actual,
                        message: format!("[COOLDOWN] {message}"),
                    })
                    .await?;
                debug!(device_id = %device_id, alert_config_id = %config.id.0, "alert suppressed by cooldown");
                return Ok(false);
            }
        }

        let history = self
            .store
            .insert_alert_history(&AlertHistory {
                id: 0,
                alert_config_id: config.id,
                device_id,
                triggered_at: now,
                actual_value: actual,
                message: message.clone(),
            })
            .await?;

        self.store
            .upsert_cooldown(&panfm_model::AlertCooldown {
                device_id,
                alert_config_id: config.id,
                expires_at: now + chrono::Duration::from_std(config.severity.cooldown()).unwrap(),
            })
            .await?;

        let event = AlertEvent {
            alert_config_id: config.id,
            severity: config.severity,
            metric_type: config.metric_type.clone(),
            threshold_value: config.threshold_value,
            threshold_operator: config.operator,
            actual_value: actual,
            message,
            device_name: device_name.to_string(),
            device_id,
            timestamp: sample.time,
            notification_channels: config.notification_channels.clone(),
        };

        let outcomes = notifier.dispatch(&event).await;
        let sent_count = outcomes.iter().filter(|o| o.sent).count();
        info!(
            device_id = %device_id,
            alert_config_id = %config.id.0,
            history_id = history.id,
            channels_sent = sent_count,
            "alert dispatched"
        );

        Ok(true)
    }

    async fn format_message(
        &self,
        device_id: DeviceId,
        device_name: &str,
        config: &AlertConfig,
        actual: f64,
    ) -> Result<String> {
        let mut message = format!(
            "{device_name}: {} {} {} (actual {actual})",
            config.metric_type,
            config.operator.as_str(),
            config.threshold_value,
        );

        if PER_SOURCE_METRICS.contains(&config.metric_type.as_str()) {
            let top_clients = self
                .store
                .get_top_clients(device_id, chrono::Duration::minutes(5), 5)
                .await?;

            if let Some(top) = top_clients.first() {
                let hostname = top.hostname.as_deref().unwrap_or("unknown");
                message.push_str(&format!(
                    " — top source {} ({hostname}, {} bytes)",
                    top.ip, top.bytes
                ));
            }

            if top_clients.len() > 1 {
                let breakdown = top_clients
                    .iter()
                    .map(|c| format!("{} ({} bytes)", c.ip, c.bytes))
                    .collect::<Vec<_>>()
                    .join(", ");
                message.push_str(&format!("; top clients: {breakdown}"));
            }
        }

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::PER_SOURCE_METRICS;

    #[test]
    fn per_source_metrics_cover_all_throughput_directions() {
        assert!(PER_SOURCE_METRICS.contains(&"throughput_in"));
        assert!(PER_SOURCE_METRICS.contains(&"throughput_out"));
        assert!(PER_SOURCE_METRICS.contains(&"throughput_total"));
    }
}
