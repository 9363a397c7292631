//! Per-creator token storage. Values are sealed before they are written.

use super::encryption::{SealedValue, TokenCipher};
use super::{CredentialError, TokenPair};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

/// Encrypted form of a [`TokenPair`]. This is the only shape that reaches storage.
#[derive(Clone, Debug)]
struct SealedTokens {
    access_token: SealedValue,
    refresh_token: Option<SealedValue>,
    expires_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

/// In-memory vault of encrypted OAuth tokens keyed by creator id.
///
/// Contents do not survive a restart.
pub struct TokenVault {
    cipher: TokenCipher,
    entries: DashMap<String, SealedTokens>,
}

impl TokenVault {
    /// Build a vault from a base64-encoded 32-byte key.
    pub fn new(key_base64: &str) -> Result<Self, CredentialError> {
        let cipher = TokenCipher::from_base64_key(key_base64).map_err(CredentialError::InvalidKey)?;
        Ok(Self {
            cipher,
            entries: DashMap::new(),
        })
    }

    /// Encrypt and store both tokens, replacing any previous entry.
    pub fn seal(&self, creator_id: &str, tokens: &TokenPair) -> Result<(), CredentialError> {
        let access_token = self
            .cipher
            .seal(&tokens.access_token)
            .map_err(CredentialError::Encryption)?;
        let refresh_token = tokens
            .refresh_token
            .as_deref()
            .map(|t| self.cipher.seal(t))
            .transpose()
            .map_err(CredentialError::Encryption)?;

        self.entries.insert(
            creator_id.to_string(),
            SealedTokens {
                access_token,
                refresh_token,
                expires_at: tokens.expires_at,
                updated_at: Utc::now(),
            },
        );
        debug!(creator_id = %creator_id, "Sealed OAuth tokens");
        Ok(())
    }

    /// Decrypt the stored tokens for `creator_id`, if any.
    pub fn open(&self, creator_id: &str) -> Result<Option<TokenPair>, CredentialError> {
        let Some(entry) = self.entries.get(creator_id) else {
            return Ok(None);
        };

        let access_token = self
            .cipher
            .open(&entry.access_token)
            .map_err(CredentialError::Decryption)?;
        let refresh_token = entry
            .refresh_token
            .as_ref()
            .map(|t| self.cipher.open(t))
            .transpose()
            .map_err(CredentialError::Decryption)?;

        Ok(Some(TokenPair {
            access_token,
            refresh_token,
            expires_at: entry.expires_at,
        }))
    }

    /// When the tokens for `creator_id` were last written.
    pub fn updated_at(&self, creator_id: &str) -> Option<DateTime<Utc>> {
        self.entries.get(creator_id).map(|e| e.updated_at)
    }

    pub fn remove(&self, creator_id: &str) -> bool {
        self.entries.remove(creator_id).is_some()
    }

    pub fn contains(&self, creator_id: &str) -> bool {
        self.entries.contains_key(creator_id)
    }
}
