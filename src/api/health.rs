//! GET /api/health

use crate::config::AiConfig;
use crate::health::{self, CheckStatus, HealthChecks};
use crate::templates::{TemplateCache, TemplateStore};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Shared application state for the health endpoint
#[derive(Clone)]
pub struct HealthAppState {
    pub store: Arc<dyn TemplateStore>,
    pub template_cache: Arc<TemplateCache>,
    pub ai: AiConfig,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: CheckStatus,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
    pub checks: HealthChecks,
}

pub fn create_health_router(state: HealthAppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .with_state(Arc::new(state))
}

/// Runs every check and answers 200 when healthy, 503 otherwise. The body is
/// returned in both cases.
async fn health_check(State(state): State<Arc<HealthAppState>>) -> Response {
    let (database, _) = tokio::join!(
        health::check_database(state.store.as_ref()),
        state.template_cache.get_cached_templates()
    );
    let cache_health = state.template_cache.health().await;

    let checks = HealthChecks {
        database,
        ai: health::check_ai(&state.ai),
        templates: health::check_templates(&cache_health),
    };
    let status = checks.overall();

    let code = if status == CheckStatus::Healthy {
        StatusCode::OK
    } else {
        tracing::warn!(checks = ?checks, "Health check reports unhealthy");
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
        checks,
    };

    (code, Json(body)).into_response()
}
