//! OnlyFans OAuth 2.0 authorization code flow.
//!
//! 1. POST /api/creators/:creator_id/connect returns an authorization URL
//!    whose `state` is the creator id
//! 2. The creator approves on the provider's site
//! 3. The provider redirects to GET /api/auth/onlyfans/callback
//! 4. The code is exchanged for tokens, which are sealed into the vault
//! 5. The browser is sent back to /creators with the outcome in the query

mod exchange;
mod provider;

pub use exchange::{OAuthConnector, OAuthError};
pub use provider::{OAuthProviderConfig, DEFAULT_AUTH_URL, DEFAULT_SCOPES, DEFAULT_TOKEN_URL};

use crate::credentials::TokenVault;
use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shared application state for the OAuth callback
#[derive(Clone)]
pub struct OAuthAppState {
    /// None when OnlyFans client credentials are not configured
    pub connector: Option<Arc<OAuthConnector>>,
    /// None when no encryption key is configured
    pub vault: Option<Arc<TokenVault>>,
    /// Origin prefixed to the /creators redirect (may be empty)
    pub public_url: String,
}

/// OAuth callback query parameters
#[derive(Deserialize)]
pub struct OAuthCallback {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Query string appended to the /creators redirect.
#[derive(Serialize, Default)]
struct CallbackOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    connected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sync: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Why a callback did not complete. Each maps to an `error=` code.
#[derive(Debug, PartialEq)]
enum CallbackFailure {
    /// The provider reported an error (e.g. `access_denied`)
    Provider(String),
    InvalidCallback,
    TokenExchangeFailed,
    CallbackFailed,
}

impl CallbackFailure {
    fn code(&self) -> &str {
        match self {
            CallbackFailure::Provider(error) => error.as_str(),
            CallbackFailure::InvalidCallback => "invalid_callback",
            CallbackFailure::TokenExchangeFailed => "token_exchange_failed",
            CallbackFailure::CallbackFailed => "callback_failed",
        }
    }
}

/// Create OAuth API router
pub fn create_oauth_router(state: OAuthAppState) -> Router {
    Router::new()
        .route("/api/auth/onlyfans/callback", get(oauth_callback))
        .with_state(Arc::new(state))
}

/// GET /api/auth/onlyfans/callback
///
/// Always answers with a redirect to `/creators`: `connected=<id>&sync=start`
/// on success, `error=<code>` otherwise.
async fn oauth_callback(
    State(state): State<Arc<OAuthAppState>>,
    Query(callback): Query<OAuthCallback>,
) -> Redirect {
    let outcome = match complete_callback(&state, callback).await {
        Ok(creator_id) => CallbackOutcome {
            connected: Some(creator_id),
            sync: Some("start"),
            ..CallbackOutcome::default()
        },
        Err(failure) => CallbackOutcome {
            error: Some(failure.code().to_string()),
            ..CallbackOutcome::default()
        },
    };

    let query = serde_urlencoded::to_string(&outcome).unwrap_or_default();
    Redirect::temporary(&format!("{}/creators?{}", state.public_url, query))
}

async fn complete_callback(
    state: &OAuthAppState,
    callback: OAuthCallback,
) -> Result<String, CallbackFailure> {
    if let Some(error) = callback.error {
        let description = callback
            .error_description
            .unwrap_or_else(|| "Unknown error".to_string());
        warn!(error = %error, description = %description, "OAuth authorization failed");
        return Err(CallbackFailure::Provider(error));
    }

    let (code, creator_id) = match (callback.code, callback.state) {
        (Some(code), Some(creator_id)) if !code.is_empty() && !creator_id.is_empty() => {
            (code, creator_id)
        }
        _ => {
            warn!("OAuth callback missing code or state");
            return Err(CallbackFailure::InvalidCallback);
        }
    };

    debug!(creator_id = %creator_id, "OAuth callback received");

    let connector = state.connector.as_ref().ok_or_else(|| {
        error!("OAuth callback received but OnlyFans OAuth is not configured");
        CallbackFailure::CallbackFailed
    })?;

    let tokens = connector
        .exchange_code_for_token(&code)
        .await
        .map_err(|e| {
            error!(creator_id = %creator_id, error = %e, "Token exchange failed");
            CallbackFailure::TokenExchangeFailed
        })?;

    let vault = state.vault.as_ref().ok_or_else(|| {
        error!(creator_id = %creator_id, "No token vault configured (missing ENCRYPTION_KEY?)");
        CallbackFailure::CallbackFailed
    })?;

    vault.seal(&creator_id, &tokens).map_err(|e| {
        error!(creator_id = %creator_id, error = %e, "Failed to store tokens");
        CallbackFailure::CallbackFailed
    })?;

    info!(
        creator_id = %creator_id,
        has_refresh_token = tokens.refresh_token.is_some(),
        "OnlyFans account connected"
    );

    Ok(creator_id)
}
