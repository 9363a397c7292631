use super::types::{CreatorProfile, Fan, Transaction};
use super::ApiClientError;
use crate::rate_limit::RateLimiter;
use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Header carrying the static API key when no per-call token is supplied.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Upper bound on a single API call, from send to the last body byte.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Method and optional JSON body for a single API call.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn post(body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
        }
    }
}

/// HTTP client for the OnlyFans REST API.
///
/// Authenticates per call with a creator's bearer token, falling back to the
/// configured API key.
pub struct OnlyFansClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
    rate_limiter: Arc<RateLimiter>,
}

impl OnlyFansClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Result<Self, ApiClientError> {
        let http_client = Client::builder()
            .user_agent(concat!("creator-crm/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            rate_limiter,
        })
    }

    fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// Issue one rate-limited request and decode the JSON response into `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
        access_token: Option<&str>,
    ) -> Result<T, ApiClientError> {
        self.rate_limiter.acquire_slot().await;

        let url = self.url_for(endpoint);
        debug!(method = %options.method, url = %url, "Sending OnlyFans API request");

        let mut builder = self
            .http_client
            .request(options.method, &url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");

        builder = match (access_token, &self.api_key) {
            (Some(token), _) => builder.bearer_auth(token),
            (None, Some(key)) => builder.header(API_KEY_HEADER, key),
            (None, None) => builder,
        };

        if let Some(body) = options.body {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(url = %url, status = %status, "OnlyFans API returned an error");
            return Err(ApiClientError::Api { status, body: text });
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// GET /me
    pub async fn get_profile(&self, access_token: &str) -> Result<CreatorProfile, ApiClientError> {
        self.request("/me", RequestOptions::default(), Some(access_token))
            .await
    }

    /// GET /fans
    pub async fn list_fans(&self, access_token: &str) -> Result<Vec<Fan>, ApiClientError> {
        self.request("/fans", RequestOptions::default(), Some(access_token))
            .await
    }

    /// GET /transactions
    pub async fn list_transactions(
        &self,
        access_token: &str,
    ) -> Result<Vec<Transaction>, ApiClientError> {
        self.request("/transactions", RequestOptions::default(), Some(access_token))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use std::time::Duration;

    fn client_for(server: &Server, api_key: Option<&str>) -> OnlyFansClient {
        OnlyFansClient::new(
            server.url(),
            api_key.map(|k| k.to_string()),
            Arc::new(RateLimiter::new(Duration::ZERO)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_bearer_token_takes_precedence_over_api_key() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/me")
            .match_header("authorization", "Bearer creator_token")
            .match_header("x-api-key", Matcher::Missing)
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(r#"{"id": "c1", "username": "alice", "subscribers_count": 12}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("static_key"));
        let profile = client.get_profile("creator_token").await.unwrap();

        assert_eq!(profile.username, "alice");
        assert_eq!(profile.subscribers_count, 12);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_key_used_without_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/status")
            .match_header("x-api-key", "static_key")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("static_key"));
        let body: serde_json::Value = client
            .request("status", RequestOptions::default(), None)
            .await
            .unwrap();

        assert_eq!(body["ok"], true);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_auth_header_when_unconfigured() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/public")
            .match_header("x-api-key", Matcher::Missing)
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = client_for(&server, None);
        let body: Vec<serde_json::Value> = client
            .request("/public", RequestOptions::default(), None)
            .await
            .unwrap();

        assert!(body.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/messages")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({"fan_id": "f1", "text": "hi"})))
            .with_status(201)
            .with_body(r#"{"id": "m1"}"#)
            .create_async()
            .await;

        let client = client_for(&server, None);
        let body: serde_json::Value = client
            .request(
                "/messages",
                RequestOptions::post(serde_json::json!({"fan_id": "f1", "text": "hi"})),
                Some("tok"),
            )
            .await
            .unwrap();

        assert_eq!(body["id"], "m1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_2xx_is_api_error_with_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/fans")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let client = client_for(&server, None);
        let err = client.list_fans("tok").await.unwrap_err();

        match err {
            ApiClientError::Api { status, body } => {
                assert_eq!(status.as_u16(), 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_parse_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/transactions")
            .with_status(200)
            .with_body("{not json")
            .create_async()
            .await;

        let client = client_for(&server, None);
        let err = client.list_transactions("tok").await.unwrap_err();
        assert!(matches!(err, ApiClientError::Parse(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_trimmed() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/fans")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = OnlyFansClient::new(
            format!("{}/", server.url()),
            None,
            Arc::new(RateLimiter::new(Duration::ZERO)),
        )
        .unwrap();
        let fans = client.list_fans("tok").await.unwrap();

        assert!(fans.is_empty());
        mock.assert_async().await;
    }
}
