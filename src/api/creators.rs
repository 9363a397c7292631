//! Creator endpoints: start an OnlyFans connection, read sync status.

use crate::api::error::AppError;
use crate::api::oauth::OAuthConnector;
use crate::sync::{SyncStatusRecord, SyncStatusTracker};
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shared application state for creator API
#[derive(Clone)]
pub struct CreatorAppState {
    /// None when OnlyFans client credentials are not configured
    pub oauth: Option<Arc<OAuthConnector>>,
    pub sync_tracker: Arc<SyncStatusTracker>,
}

/// Request body for POST /api/creators/:creator_id/connect
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    #[serde(default)]
    pub of_username: Option<String>,
}

/// Response for POST /api/creators/:creator_id/connect
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    pub success: bool,
    pub auth_url: String,
    pub message: String,
}

/// Create creator API router
pub fn create_creator_router(state: CreatorAppState) -> Router {
    Router::new()
        .route("/api/creators/:creator_id/connect", post(connect_creator))
        .route("/api/creators/:creator_id/sync-status", get(get_sync_status))
        .with_state(Arc::new(state))
}

/// POST /api/creators/:creator_id/connect
///
/// Returns the OnlyFans authorization URL for this creator. The browser is
/// expected to navigate there; the provider calls back with `state=<creator_id>`.
async fn connect_creator(
    State(state): State<Arc<CreatorAppState>>,
    Path(creator_id): Path<String>,
    body: Bytes,
) -> Result<Json<ConnectResponse>, AppError> {
    let request: ConnectRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON: {}", e)))?;

    let username = request
        .of_username
        .map(|u| u.trim().trim_start_matches('@').to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| {
            warn!(creator_id = %creator_id, "Connect request without OnlyFans username");
            AppError::BadRequest("OnlyFans username is required".to_string())
        })?;

    let connector = state.oauth.as_ref().ok_or_else(|| {
        error!("OnlyFans OAuth not configured (missing ONLYFANS_CLIENT_ID / ONLYFANS_CLIENT_SECRET?)");
        AppError::ServerError("OnlyFans OAuth is not configured".to_string())
    })?;

    let auth_url = connector.authorization_url(&creator_id);

    info!(creator_id = %creator_id, of_username = %username, "Generated OnlyFans authorization URL");

    Ok(Json(ConnectResponse {
        success: true,
        auth_url,
        message: format!("Authorize access to @{} on OnlyFans to finish connecting", username),
    }))
}

/// GET /api/creators/:creator_id/sync-status
async fn get_sync_status(
    State(state): State<Arc<CreatorAppState>>,
    Path(creator_id): Path<String>,
) -> Json<SyncStatusRecord> {
    debug!(creator_id = %creator_id, "Sync status requested");
    Json(state.sync_tracker.get_status(&creator_id))
}
