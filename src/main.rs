use anyhow::{Context, Result};
use creator_crm::api::{create_router, AppServices, OAuthConnector};
use creator_crm::config::AppConfig;
use creator_crm::credentials::TokenVault;
use creator_crm::onlyfans::OnlyFansClient;
use creator_crm::rate_limit::RateLimiter;
use creator_crm::sync::{SyncStatusTracker, SyncWorker};
use creator_crm::templates::{RestTemplateStore, TemplateCache, TemplateStore};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "creator_crm=info".into()),
        )
        .init();

    info!("Creator CRM starting...");

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let (store_url, store_key) = config.store.require()?;

    info!(
        bind_addr = %config.server.bind_addr,
        api_base_url = %config.onlyfans.api_base_url,
        rate_limit_ms = config.onlyfans.rate_limit_delay_ms,
        template_ttl_secs = config.cache.template_ttl_seconds,
        mock_ai = config.ai.use_mock,
        "Configuration loaded"
    );

    // One limiter for every outbound OnlyFans call
    let rate_limiter = Arc::new(RateLimiter::new(config.onlyfans.rate_limit_delay()));

    let client = Arc::new(
        OnlyFansClient::new(
            config.onlyfans.api_base_url.clone(),
            config.onlyfans.api_key.clone(),
            Arc::clone(&rate_limiter),
        )
        .context("Failed to build OnlyFans API client")?,
    );

    let oauth = match config.onlyfans.oauth_provider() {
        Ok(provider) => Some(Arc::new(OAuthConnector::new(
            provider,
            config.oauth_redirect_uri(),
            Arc::clone(&rate_limiter),
        ))),
        Err(e) => {
            warn!(error = %e, "OnlyFans OAuth disabled");
            None
        }
    };

    let vault = match config.security.encryption_key.as_deref() {
        Some(key) => Some(Arc::new(
            TokenVault::new(key).context("Failed to initialize token vault")?,
        )),
        None => {
            warn!("ENCRYPTION_KEY not set, OAuth callbacks cannot store tokens");
            None
        }
    };

    let store: Arc<dyn TemplateStore> = Arc::new(
        RestTemplateStore::new(store_url, store_key).context("Failed to build data store client")?,
    );
    let template_cache = Arc::new(TemplateCache::new(
        Arc::clone(&store),
        config.cache.template_ttl(),
    ));

    let sync_tracker = Arc::new(SyncStatusTracker::new());
    let sync_worker = vault.as_ref().map(|vault| {
        Arc::new(SyncWorker::new(
            Arc::clone(&client),
            Arc::clone(&sync_tracker),
            Arc::clone(vault),
        ))
    });

    let router = create_router(AppServices {
        oauth,
        vault,
        sync_tracker,
        sync_worker,
        store,
        template_cache,
        ai: config.ai.clone(),
        public_url: config.server.public_url.clone(),
    });

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!(addr = %config.server.bind_addr, "HTTP API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("HTTP server error")?;

    info!("Creator CRM stopped");
    Ok(())
}
