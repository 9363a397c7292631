// Outbound request spacing for the OnlyFans API.
//
// One limiter per process, shared by Arc between the API client and the OAuth
// connector. The wait-then-stamp sequence runs under a tokio Mutex, so
// concurrent callers queue in lock order and never observe a stale stamp.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Minimum spacing between two outbound calls.
pub const DEFAULT_REQUEST_SPACING: Duration = Duration::from_millis(1000);

/// Enforces a minimum gap between the starts of consecutive outbound requests.
///
/// State is in-memory only (resets on restart).
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Wait until `min_interval` has passed since the previous slot started,
    /// then record the start of this one.
    pub async fn acquire_slot(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            let now = Instant::now();
            if ready_at > now {
                debug!(
                    wait_ms = (ready_at - now).as_millis() as u64,
                    "Rate limiter delaying outbound request"
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }

        *last = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_SPACING)
    }
}
