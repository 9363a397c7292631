//! Message templates used by chatters, read through a TTL cache.

mod cache;
mod store;

pub use cache::{CacheEntry, CacheHealth, TemplateCache, DEFAULT_TEMPLATE_TTL};
pub use store::{RestTemplateStore, StoreError, TemplateStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reusable message template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}
