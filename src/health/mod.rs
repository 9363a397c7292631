//! Dependency health checks.
//!
//! Each check reports healthy, degraded or unhealthy. Only an unhealthy check
//! fails the overall status; degraded means "working with reduced fidelity"
//! (mock AI, stale templates).

use crate::config::AiConfig;
use crate::templates::{CacheHealth, TemplateStore};
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

/// A data store ping that takes longer than this counts as a failure.
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub ai: CheckStatus,
    pub templates: CheckStatus,
}

impl HealthChecks {
    /// Unhealthy if any check is unhealthy, healthy otherwise.
    pub fn overall(&self) -> CheckStatus {
        let all = [self.database, self.ai, self.templates];
        if all.contains(&CheckStatus::Unhealthy) {
            CheckStatus::Unhealthy
        } else {
            CheckStatus::Healthy
        }
    }
}

/// Ping the data store, bounded by [`PING_TIMEOUT`].
pub async fn check_database(store: &dyn TemplateStore) -> CheckStatus {
    match tokio::time::timeout(PING_TIMEOUT, store.ping()).await {
        Ok(Ok(())) => CheckStatus::Healthy,
        Ok(Err(e)) => {
            warn!(error = %e, "Database health check failed");
            CheckStatus::Unhealthy
        }
        Err(_) => {
            warn!(
                timeout_ms = PING_TIMEOUT.as_millis() as u64,
                "Database health check timed out"
            );
            CheckStatus::Unhealthy
        }
    }
}

/// A real key is healthy, forced mock mode is degraded, no key at all is unhealthy.
pub fn check_ai(config: &AiConfig) -> CheckStatus {
    match (&config.api_key, config.use_mock) {
        (_, true) => CheckStatus::Degraded,
        (Some(_), false) => CheckStatus::Healthy,
        (None, false) => CheckStatus::Unhealthy,
    }
}

/// Degraded while the cache is serving data from before a failed refresh.
pub fn check_templates(cache: &CacheHealth) -> CheckStatus {
    if cache.last_refresh_failed {
        CheckStatus::Degraded
    } else {
        CheckStatus::Healthy
    }
}
