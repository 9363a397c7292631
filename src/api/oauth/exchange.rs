//! Authorization URL construction and code-for-token exchange.

use super::provider::OAuthProviderConfig;
use crate::credentials::TokenPair;
use crate::rate_limit::RateLimiter;
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Why a token exchange failed.
#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("token endpoint returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("invalid token response: {0}")]
    InvalidResponse(String),
}

/// OAuth token response (standard OAuth 2.0)
#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Two-step OAuth connector for creator accounts.
///
/// Holds no per-flow state: the creator id travels through the provider as
/// the `state` parameter.
pub struct OAuthConnector {
    provider: OAuthProviderConfig,
    redirect_uri: String,
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
}

impl OAuthConnector {
    pub fn new(
        provider: OAuthProviderConfig,
        redirect_uri: impl Into<String>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            provider,
            redirect_uri: redirect_uri.into(),
            http_client: reqwest::Client::new(),
            rate_limiter,
        }
    }

    /// Authorization URL for `creator_id`.
    pub fn authorization_url(&self, creator_id: &str) -> String {
        self.provider.build_auth_url(creator_id, &self.redirect_uri)
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code_for_token(&self, code: &str) -> Result<TokenPair, OAuthError> {
        let mut form_data = HashMap::new();
        form_data.insert("grant_type", "authorization_code");
        form_data.insert("code", code);
        form_data.insert("redirect_uri", self.redirect_uri.as_str());
        form_data.insert("client_id", self.provider.client_id.as_str());
        form_data.insert("client_secret", self.provider.client_secret.as_str());

        self.rate_limiter.acquire_slot().await;
        tracing::debug!(
            token_url = %self.provider.token_url,
            "Exchanging authorization code for token"
        );

        let response = self
            .http_client
            .post(&self.provider.token_url)
            .header("Accept", "application/json")
            .form(&form_data)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(OAuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let token_response: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| OAuthError::InvalidResponse(e.to_string()))?;
        if token_response.access_token.is_empty() {
            return Err(OAuthError::InvalidResponse("empty access_token".to_string()));
        }

        tracing::debug!(
            has_refresh_token = token_response.refresh_token.is_some(),
            expires_in = ?token_response.expires_in,
            "Token exchange successful"
        );

        let expires_at = token_response
            .expires_in
            .map(|seconds| Utc::now() + Duration::seconds(seconds));

        Ok(TokenPair {
            access_token: token_response.access_token,
            refresh_token: token_response.refresh_token,
            expires_at,
        })
    }
}
