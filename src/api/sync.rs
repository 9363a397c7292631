//! Sync trigger endpoints.

use crate::api::error::AppError;
use crate::sync::{SyncStatusTracker, SyncWorker};
use axum::{
    body::Bytes,
    extract::State,
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Shared application state for sync API
#[derive(Clone)]
pub struct SyncAppState {
    pub sync_tracker: Arc<SyncStatusTracker>,
    /// None when the vault or API client is unavailable; POST then only acknowledges
    pub worker: Option<Arc<SyncWorker>>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SyncRequest {
    #[serde(default)]
    creator_id: Option<String>,
}

#[derive(Serialize)]
pub struct SyncTriggerResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncServiceStatus {
    pub status: &'static str,
    pub last_sync: Option<DateTime<Utc>>,
}

pub fn create_sync_router(state: SyncAppState) -> Router {
    Router::new()
        .route("/api/sync", get(sync_status).post(trigger_sync))
        .with_state(Arc::new(state))
}

/// POST /api/sync
///
/// With `{"creatorId": ...}` and a configured worker, starts a background sync
/// for that creator. Otherwise just acknowledges the request.
async fn trigger_sync(
    State(state): State<Arc<SyncAppState>>,
    body: Bytes,
) -> Result<Json<SyncTriggerResponse>, AppError> {
    let request: SyncRequest = if body.is_empty() {
        SyncRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON: {}", e)))?
    };

    let (Some(creator_id), Some(worker)) = (request.creator_id, state.worker.clone()) else {
        debug!("Sync requested without a runnable target");
        return Ok(Json(SyncTriggerResponse {
            success: true,
            message: "Sync request received".to_string(),
        }));
    };

    if !state.sync_tracker.begin_sync(&creator_id, "Sync queued") {
        debug!(creator_id = %creator_id, "Sync already running, not spawning another");
        return Ok(Json(SyncTriggerResponse {
            success: true,
            message: format!("Sync already in progress for {}", creator_id),
        }));
    }

    info!(creator_id = %creator_id, "Spawning creator sync");
    let id = creator_id.clone();
    tokio::spawn(async move {
        // Outcome is recorded in the tracker by the worker
        let _ = worker.run(&id).await;
    });

    Ok(Json(SyncTriggerResponse {
        success: true,
        message: format!("Sync started for {}", creator_id),
    }))
}

/// GET /api/sync
async fn sync_status(State(state): State<Arc<SyncAppState>>) -> Json<SyncServiceStatus> {
    Json(SyncServiceStatus {
        status: "online",
        last_sync: state.sync_tracker.last_sync_at(),
    })
}
