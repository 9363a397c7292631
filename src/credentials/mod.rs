//! OAuth token model and encryption at rest.
//!
//! ```text
//! OAuth callback ──TokenPair──▶ TokenVault::seal ──▶ AES-256-GCM ──▶ SealedTokens
//! SyncWorker     ◀─TokenPair─── TokenVault::open ◀── AES-256-GCM ◀──┘
//! ```
//!
//! Tokens only ever reach storage in sealed form. The vault is process memory
//! for now; a durable backend must keep the same seal-before-write contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod encryption;
mod vault;

pub use encryption::{validate_key, SealedValue, TokenCipher};
pub use vault::TokenVault;

/// Tokens returned by the provider's token endpoint.
///
/// Never expose these through a public API.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TokenPair {
    /// Bearer token for API requests
    pub access_token: String,

    /// Used to obtain new access tokens
    pub refresh_token: Option<String>,

    /// When the access token expires (UTC)
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("invalid encryption key: {0}")]
    InvalidKey(anyhow::Error),

    #[error("failed to encrypt token: {0}")]
    Encryption(anyhow::Error),

    #[error("failed to decrypt token: {0}")]
    Decryption(anyhow::Error),
}
