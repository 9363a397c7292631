//! Backing store for message templates.
//!
//! The data store is a PostgREST-style backend-as-a-service: tables are read
//! with `GET {url}/rest/v1/<table>` and authenticated with its API key.

use super::Template;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Upper bound on a single data store request.
pub const STORE_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("data store request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("data store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("data store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to templates.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// All templates, newest first.
    async fn list_templates(&self) -> Result<Vec<Template>, StoreError>;

    /// Cheap connectivity probe.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// [`TemplateStore`] backed by the data store's REST interface.
pub struct RestTemplateStore {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl RestTemplateStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, StoreError> {
        let http_client = Client::builder().timeout(STORE_REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    async fn get(&self, query: &str) -> Result<reqwest::Response, StoreError> {
        let url = format!("{}/rest/v1/templates?{}", self.base_url, query);
        debug!(url = %url, "Querying data store");

        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }
        Ok(response)
    }
}

#[async_trait]
impl TemplateStore for RestTemplateStore {
    async fn list_templates(&self) -> Result<Vec<Template>, StoreError> {
        let response = self.get("select=*&order=created_at.desc").await?;
        Ok(response.json().await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.get("select=id&limit=1").await.map(|_| ())
    }
}
