//! Dispatches a fired [`AlertEvent`] to the enabled email/webhook/Slack
//! channels, recording a per-channel outcome instead of raising on the
//! first failure (an operator's broken webhook must never block an email
//! that would have gone through).

mod email;
mod slack;
mod webhook;

use async_trait::async_trait;
use panfm_model::{AlertEvent, DispatchOutcome, NotificationChannelConfig, NotificationChannelKind};
use tracing::warn;

use crate::error::Result;
use crate::store::PostgresStore;

/// Capability seam the Alert Engine dispatches through, so unit tests can
/// swap in a mock instead of hitting SMTP/HTTP. Mirrors the
/// `#[async_trait]` + `mockall::automock` shape `panfm-contracts`'s
/// `FirewallClient` uses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn dispatch(&self, event: &AlertEvent) -> Vec<DispatchOutcome>;
}

/// Loads channel configuration relationally first, env-var second, and
/// sends through each enabled channel concurrently.
pub struct NotificationDispatcher {
    store: PostgresStore,
}

impl NotificationDispatcher {
    pub fn new(store: PostgresStore) -> Self {
        Self { store }
    }

    /// Relational override, falling back to environment variables when no
    /// `notification_channel` row exists yet — mirrors
    /// `notification_manager.py`'s layered `_load_*_config`.
    async fn load_config(&self, kind: NotificationChannelKind) -> Result<NotificationChannelConfig> {
        match self.store.get_notification_channel(kind).await? {
            Some(config) => Ok(config),
            None => Ok(panfm_config::notification::channel_from_env(kind)),
        }
    }

    async fn send_one(&self, kind: NotificationChannelKind, event: &AlertEvent) -> DispatchOutcome {
        let config = match self.load_config(kind).await {
            Ok(config) => config,
            Err(e) => {
                return DispatchOutcome {
                    channel: kind,
                    enabled: false,
                    sent: false,
                    error: Some(e.to_string()),
                }
            }
        };

        if !config.enabled {
            return DispatchOutcome {
                channel: kind,
                enabled: false,
                sent: false,
                error: None,
            };
        }

        let result = match kind {
            NotificationChannelKind::Email => email::send(&config, event).await,
            NotificationChannelKind::Webhook => webhook::send(&config, event).await,
            NotificationChannelKind::Slack => slack::send(&config, event).await,
        };

        match result {
            Ok(()) => DispatchOutcome {
                channel: kind,
                enabled: true,
                sent: true,
                error: None,
            },
            Err(e) => {
                warn!(channel = ?kind, error = %e, "notification channel send failed");
                DispatchOutcome {
                    channel: kind,
                    enabled: true,
                    sent: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Sends a canonical test payload on one channel, returning the raw
    /// result rather than a [`DispatchOutcome`] since the caller (an admin
    /// "test this channel" action) wants the error surfaced directly.
    pub async fn send_test(&self, kind: NotificationChannelKind) -> Result<()> {
        let config = self.load_config(kind).await?;
        match kind {
            NotificationChannelKind::Email => email::send_test(&config).await,
            NotificationChannelKind::Webhook => webhook::send_test(&config).await,
            NotificationChannelKind::Slack => slack::send_test(&config).await,
        }
    }
}

#[async_trait]
impl Notifier for NotificationDispatcher {
    async fn dispatch(&self, event: &AlertEvent) -> Vec<DispatchOutcome> {
        let mut outcomes = Vec::with_capacity(event.notification_channels.len());
        for kind in &event.notification_channels {
            outcomes.push(self.send_one(*kind, event).await);
        }
        outcomes
    }
}
