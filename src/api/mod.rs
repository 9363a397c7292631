// HTTP API: creator connect flow, sync status, health

mod error;
pub mod creators;
pub mod health;
pub mod oauth;
pub mod sync;

pub use creators::{create_creator_router, CreatorAppState};
pub use health::{create_health_router, HealthAppState};
pub use oauth::{create_oauth_router, OAuthAppState, OAuthConnector};
pub use sync::{create_sync_router, SyncAppState};

use crate::config::AiConfig;
use crate::credentials::TokenVault;
use crate::sync::{SyncStatusTracker, SyncWorker};
use crate::templates::{TemplateCache, TemplateStore};
use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Everything the routers share, constructed once in `main`.
#[derive(Clone)]
pub struct AppServices {
    pub oauth: Option<Arc<OAuthConnector>>,
    pub vault: Option<Arc<TokenVault>>,
    pub sync_tracker: Arc<SyncStatusTracker>,
    pub sync_worker: Option<Arc<SyncWorker>>,
    pub store: Arc<dyn TemplateStore>,
    pub template_cache: Arc<TemplateCache>,
    pub ai: AiConfig,
    pub public_url: String,
}

/// Merge every route group into one router with request tracing and CORS.
pub fn create_router(services: AppServices) -> Router {
    Router::new()
        .merge(create_oauth_router(OAuthAppState {
            connector: services.oauth.clone(),
            vault: services.vault.clone(),
            public_url: services.public_url.clone(),
        }))
        .merge(create_creator_router(CreatorAppState {
            oauth: services.oauth.clone(),
            sync_tracker: Arc::clone(&services.sync_tracker),
        }))
        .merge(create_sync_router(SyncAppState {
            sync_tracker: Arc::clone(&services.sync_tracker),
            worker: services.sync_worker.clone(),
        }))
        .merge(create_health_router(HealthAppState {
            store: services.store,
            template_cache: services.template_cache,
            ai: services.ai,
        }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
