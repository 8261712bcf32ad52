use thiserror::Error;

/// Failure taxonomy a `FirewallClient` implementation must classify every
/// error into, so the Collector can decide whether to retry, skip the
/// device for this tick, or escalate to the Alert Engine.
#[derive(Error, Debug)]
pub enum FirewallError {
    #[error("request to {device}: timed out after {elapsed_ms}ms")]
    Timeout { device: String, elapsed_ms: u64 },

    #[error("device {device} unreachable: {source}")]
    Unreachable {
        device: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("authentication failed for device {device}")]
    AuthFailed { device: String },

    #[error("unexpected response from {device}: {detail}")]
    BadResponse { device: String, detail: String },

    #[error("device {device} is rate limiting requests")]
    RateLimited { device: String },
}

pub type Result<T> = std::result::Result<T, FirewallError>;
