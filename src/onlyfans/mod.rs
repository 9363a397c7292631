//! OnlyFans REST API integration.
//!
//! Every outbound call goes through the shared [`RateLimiter`](crate::rate_limit::RateLimiter)
//! before it is sent. Non-2xx responses surface as [`ApiClientError::Api`]. Retries are
//! left to callers.

mod client;
mod types;

pub use client::{OnlyFansClient, RequestOptions};
pub use types::{CreatorProfile, Fan, Transaction};

use reqwest::StatusCode;
use thiserror::Error;

/// Default base URL for the OnlyFans API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.onlyfans.com/v1";

/// Failures raised by [`OnlyFansClient::request`].
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// The API answered with a non-2xx status.
    #[error("OnlyFans API error {status}: {body}")]
    Api { status: StatusCode, body: String },

    /// A 2xx response whose body is not the expected JSON.
    #[error("Failed to parse OnlyFans API response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request never produced a response (DNS, TLS, connection reset, ...).
    #[error("OnlyFans API request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiClientError {
    /// HTTP status for `Api` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
