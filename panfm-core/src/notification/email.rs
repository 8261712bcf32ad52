use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use panfm_model::{AlertEvent, NotificationChannelConfig};

use crate::error::{CoreError, Result};

/// Renders an [`AlertEvent`] into the canonical alert email body shared by
/// real sends and [`send_test`] — one subject/body format, not a drifting
/// pair.
fn render(event: &AlertEvent) -> (String, String) {
    let subject = format!("[PANfm] {} alert on {}", event.severity, event.device_name);
    let body = format!(
        "Device: {}\nMetric: {} {} {}\nActual: {}\nTime: {}\n\n{}",
        event.device_name,
        event.metric_type,
        event.threshold_operator.as_str(),
        event.threshold_value,
        event.actual_value,
        event.timestamp.to_rfc3339(),
        event.message,
    );
    (subject, body)
}

pub async fn send(config: &NotificationChannelConfig, event: &AlertEvent) -> Result<()> {
    let (subject, body) = render(event);
    send_raw(config, &subject, &body).await
}

pub async fn send_test(config: &NotificationChannelConfig) -> Result<()> {
    send_raw(
        config,
        "[PANfm] Test notification",
        "This is a test message from the PANfm alert engine.",
    )
    .await
}

async fn send_raw(config: &NotificationChannelConfig, subject: &str, body: &str) -> Result<()> {
    let host = config
        .smtp_host
        .as_deref()
        .ok_or_else(|| CoreError::Notification("email channel enabled with no smtp_host".into()))?;
    let from: Mailbox = config
        .from_email
        .as_deref()
        .ok_or_else(|| CoreError::Notification("email channel enabled with no from_email".into()))?
        .parse()
        .map_err(|e| CoreError::Notification(format!("invalid from_email: {e}")))?;

    if config.to_emails.is_empty() {
        return Err(CoreError::Notification("email channel enabled with no recipients".into()));
    }

    let mut builder = Message::builder().from(from).subject(subject);
    for to in &config.to_emails {
        let mailbox: Mailbox = to
            .parse()
            .map_err(|e| CoreError::Notification(format!("invalid recipient {to}: {e}")))?;
        builder = builder.to(mailbox);
    }
    let message = builder
        .body(body.to_string())
        .map_err(|e| CoreError::Notification(format!("failed to build message: {e}")))?;

    let transport = build_transport(config, host)?;

    // lettre's blocking SmtpTransport is cheap enough per-send that the
    // original's synchronous smtplib usage is reproduced as-is rather than
    // threading through an async SMTP crate the pack never references.
    tokio::task::spawn_blocking(move || transport.send(&message))
        .await
        .map_err(|e| CoreError::Notification(format!("email send task panicked: {e}")))?
        .map_err(|e| CoreError::Notification(format!("smtp send failed: {e}")))?;

    Ok(())
}

fn build_transport(config: &NotificationChannelConfig, host: &str) -> Result<SmtpTransport> {
    let port = config.smtp_port.unwrap_or(587);
    let mut builder = if config.smtp_tls {
        SmtpTransport::starttls_relay(host)
            .map_err(|e| CoreError::Notification(format!("smtp relay setup failed: {e}")))?
    } else {
        SmtpTransport::builder_dangerous(host)
    };
    builder = builder.port(port);

    if let (Some(user), Some(password)) = (&config.smtp_user, &config.smtp_password) {
        builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
    }

    Ok(builder.build())
}
