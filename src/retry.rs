//! Bounded retry executor for fallible async steps.
//!
//! Navigation and interaction against a live browser fail transiently; every
//! such step runs through [`with_retries`] so one flaky load does not sink a
//! part extraction. Delays grow linearly: attempt `n` sleeps `n × base_delay`
//! before the next try. The last error propagates once the bound is exhausted.

use anyhow::{Result, anyhow};
use std::time::Duration;
use tracing::warn;

/// Run `op` up to `attempts` times, sleeping `attempt × base_delay` between
/// failures.
///
/// Each failure is logged at warn with the attempt counter and `label` (which
/// should identify the work, e.g. the part name) before the delay. No delay
/// follows the final failure; its error is returned as-is.
pub async fn with_retries<T, F, Fut>(
    label: &str,
    attempts: u32,
    base_delay: Duration,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;

    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!("{label}: attempt {attempt}/{attempts} failed: {e:#}");
                last_err = Some(e);
                if attempt < attempts {
                    tokio::time::sleep(base_delay * attempt).await;
                }
            }
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow!("{label}: retry bound of zero attempts")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = with_retries("flaky", 3, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(anyhow!("transient {n}"))
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
    async fn propagates_final_error_after_bound() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retries("doomed", 3, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err(anyhow!("failure {n}")) }
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(err.to_string().contains("failure 3"));
    }

    #[tokio::test]
    async fn first_attempt_success_skips_delay() {
        let result = with_retries("instant", 3, Duration::from_secs(60), || async { Ok(1) }).await;
        assert_eq!(result.unwrap(), 1);
    }
}
