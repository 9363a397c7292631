//! Single-slot, time-boxed cache in front of [`TemplateStore::list_templates`].

use super::store::{StoreError, TemplateStore};
use super::Template;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Default freshness window (one hour).
pub const DEFAULT_TEMPLATE_TTL: Duration = Duration::from_millis(3_600_000);

/// How long a refresh may hold the slot before it counts as failed.
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

/// A cached value and the moment it was stored.
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub value: Arc<T>,
    pub stored_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(value: Arc<T>) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// Snapshot of cache state for health reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheHealth {
    pub has_value: bool,
    pub last_refresh_failed: bool,
    pub last_error: Option<String>,
}

struct CacheState {
    entry: Option<CacheEntry<Vec<Template>>>,
    last_refresh_error: Option<String>,
}

/// Caches the full template list in one slot.
///
/// The slot lock is held across a refresh, so concurrent misses share a single
/// store query. A refresh is bounded by `refresh_timeout`; a failed or timed out
/// refresh keeps serving the previous list.
pub struct TemplateCache {
    store: Arc<dyn TemplateStore>,
    ttl: Duration,
    refresh_timeout: Duration,
    state: Mutex<CacheState>,
}

impl TemplateCache {
    pub fn new(store: Arc<dyn TemplateStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
            state: Mutex::new(CacheState {
                entry: None,
                last_refresh_error: None,
            }),
        }
    }

    pub fn with_refresh_timeout(mut self, refresh_timeout: Duration) -> Self {
        self.refresh_timeout = refresh_timeout;
        self
    }

    /// Return the cached templates, refreshing from the store when the slot is
    /// empty or older than the TTL. Never fails: on a store error the previous
    /// list (or an empty one) is returned.
    pub async fn get_cached_templates(&self) -> Arc<Vec<Template>> {
        let mut state = self.state.lock().await;

        if let Some(entry) = &state.entry {
            if entry.is_fresh(self.ttl) {
                return Arc::clone(&entry.value);
            }
        }

        debug!("Template cache miss, querying store");
        let refreshed =
            match tokio::time::timeout(self.refresh_timeout, self.store.list_templates()).await {
                Ok(result) => result,
                Err(_) => Err(StoreError::Unavailable(format!(
                    "template query timed out after {}ms",
                    self.refresh_timeout.as_millis()
                ))),
            };

        match refreshed {
            Ok(templates) => {
                info!(count = templates.len(), "Template cache refreshed");
                let value = Arc::new(templates);
                state.entry = Some(CacheEntry::new(Arc::clone(&value)));
                state.last_refresh_error = None;
                value
            }
            Err(e) => {
                warn!(
                    error = %e,
                    has_stale = state.entry.is_some(),
                    "Template refresh failed, serving previous value"
                );
                state.last_refresh_error = Some(e.to_string());
                state
                    .entry
                    .as_ref()
                    .map(|entry| Arc::clone(&entry.value))
                    .unwrap_or_default()
            }
        }
    }

    /// Drop the cached list. The next read queries the store.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.entry = None;
        debug!("Template cache invalidated");
    }

    pub async fn health(&self) -> CacheHealth {
        let state = self.state.lock().await;
        CacheHealth {
            has_value: state.entry.is_some(),
            last_refresh_failed: state.last_refresh_error.is_some(),
            last_error: state.last_refresh_error.clone(),
        }
    }
}
