use std::future::Future;
use std::time::Duration;

use rand::Rng;

use panfm_contracts::FirewallError;

const MAX_ATTEMPTS: u32 = 3;

/// Retries `op` up to two extra times on transient network failures
/// (`Timeout`/`Unreachable`), backing off `100ms * 2^n + rand(0..=50ms)`
/// between attempts. `AuthFailed`/`BadResponse`/`RateLimited` are not
/// transient and are returned immediately.
pub async fn with_retry<T, F, Fut>(mut op: F) -> Result<T, FirewallError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FirewallError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt + 1 < MAX_ATTEMPTS && is_transient(&e) => {
                let backoff = backoff_for(attempt);
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

fn is_transient(error: &FirewallError) -> bool {
    matches!(error, FirewallError::Timeout { .. } | FirewallError::Unreachable { .. })
}

fn backoff_for(attempt: u32) -> Duration {
    let base_ms = 100u64 * 2u64.pow(attempt);
    let jitter_ms = rand::thread_rng().gen_range(0..=50);
    Duration::from_millis(base_ms + jitter_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn retries_transient_errors_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = with_retry(|| {
            let calls = calls_clone.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(FirewallError::Timeout { device: "fw1".into(), elapsed_ms: 10 })
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_auth_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result: Result<(), FirewallError> = with_retry(|| {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FirewallError::AuthFailed { device: "fw1".into() })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
