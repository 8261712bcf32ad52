use std::env;

use panfm_model::{NotificationChannelConfig, NotificationChannelKind};

/// Env-var fallback for a notification channel, used when the
/// `notification_channel` table has no row for `kind` yet (first boot, or
/// an operator who only ever configures via environment). Mirrors
/// `notification_manager.py`'s `_load_email_config` / `_load_webhook_config`
/// / `_load_slack_config` fallback branches.
pub fn channel_from_env(kind: NotificationChannelKind) -> NotificationChannelConfig {
    match kind {
        NotificationChannelKind::Email => NotificationChannelConfig {
            kind,
            enabled: env_bool("ALERT_EMAIL_ENABLED", false),
            smtp_host: env::var("ALERT_SMTP_HOST").ok(),
            smtp_port: env::var("ALERT_SMTP_PORT").ok().and_then(|v| v.parse().ok()),
            smtp_user: env::var("ALERT_SMTP_USER").ok(),
            smtp_password: env::var("ALERT_SMTP_PASSWORD").ok(),
            smtp_tls: env_bool("ALERT_SMTP_TLS", true),
            from_email: env::var("ALERT_FROM_EMAIL").ok(),
            to_emails: env::var("ALERT_TO_EMAILS")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
            ..NotificationChannelConfig::disabled(kind)
        },
        NotificationChannelKind::Webhook => NotificationChannelConfig {
            kind,
            enabled: env_bool("ALERT_WEBHOOK_ENABLED", false),
            webhook_url: env::var("ALERT_WEBHOOK_URL").ok(),
            webhook_headers: env::var("ALERT_WEBHOOK_HEADERS")
                .ok()
                .map(parse_header_list)
                .unwrap_or_default(),
            ..NotificationChannelConfig::disabled(kind)
        },
        NotificationChannelKind::Slack => NotificationChannelConfig {
            kind,
            enabled: env_bool("ALERT_SLACK_ENABLED", false),
            slack_webhook_url: env::var("ALERT_SLACK_WEBHOOK_URL").ok(),
            slack_channel: env::var("ALERT_SLACK_CHANNEL").ok(),
            slack_username: env::var("ALERT_SLACK_USERNAME").ok(),
            ..NotificationChannelConfig::disabled(kind)
        },
    }
}

/// Parses `"Header-One: value1, Header-Two: value2"` into pairs, tolerating
/// a missing colon by treating the whole segment as the header name with an
/// empty value rather than dropping it.
fn parse_header_list(raw: String) -> Vec<(String, String)> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|pair| match pair.split_once(':') {
            Some((k, v)) => (k.trim().to_string(), v.trim().to_string()),
            None => (pair.trim().to_string(), String::new()),
        })
        .collect()
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multi_header_list() {
        let headers = parse_header_list("X-Api-Key: abc123, X-Source: panfm".to_string());
        assert_eq!(
            headers,
            vec![
                ("X-Api-Key".to_string(), "abc123".to_string()),
                ("X-Source".to_string(), "panfm".to_string()),
            ]
        );
    }

    #[test]
    fn disabled_channel_defaults_have_no_destination() {
        let cfg = channel_from_env(NotificationChannelKind::Webhook);
        assert!(!cfg.enabled);
        assert!(cfg.webhook_url.is_none());
    }
}
