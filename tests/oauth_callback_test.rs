// Integration tests for GET /api/auth/onlyfans/callback

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use creator_crm::api::oauth::OAuthProviderConfig;
use creator_crm::api::{create_oauth_router, OAuthAppState, OAuthConnector};
use creator_crm::credentials::TokenVault;
use creator_crm::rate_limit::RateLimiter;
use mockito::Server;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn connector(token_url: String) -> Arc<OAuthConnector> {
    let provider = OAuthProviderConfig {
        token_url,
        ..OAuthProviderConfig::onlyfans("client_1", "secret_1")
    };
    Arc::new(OAuthConnector::new(
        provider,
        "http://localhost:3000/api/auth/onlyfans/callback",
        Arc::new(RateLimiter::new(Duration::ZERO)),
    ))
}

fn vault() -> Arc<TokenVault> {
    Arc::new(TokenVault::new(&BASE64.encode([5u8; 32])).unwrap())
}

fn create_test_app(
    connector: Option<Arc<OAuthConnector>>,
    vault: Option<Arc<TokenVault>>,
) -> Router {
    create_oauth_router(OAuthAppState {
        connector,
        vault,
        public_url: String::new(),
    })
}

/// Send the callback request and return the redirect Location.
async fn callback_location(app: Router, query: &str) -> String {
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/auth/onlyfans/callback?{}", query))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_provider_error_is_forwarded() {
    let app = create_test_app(Some(connector("http://unused/token".into())), Some(vault()));
    let location = callback_location(app, "error=access_denied&state=creator_42").await;

    assert!(location.starts_with("/creators?"));
    assert!(location.contains("error=access_denied"));
}

#[tokio::test]
async fn test_missing_code_is_invalid_callback() {
    let app = create_test_app(Some(connector("http://unused/token".into())), Some(vault()));
    let location = callback_location(app, "state=creator_42").await;

    assert!(location.contains("error=invalid_callback"));
}

#[tokio::test]
async fn test_no_params_is_invalid_callback() {
    let app = create_test_app(None, None);
    let location = callback_location(app, "").await;

    assert!(location.contains("error=invalid_callback"));
}

#[tokio::test]
async fn test_failed_exchange_is_token_exchange_failed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/token")
        .with_status(401)
        .with_body(r#"{"error": "invalid_client"}"#)
        .create_async()
        .await;

    let app = create_test_app(Some(connector(format!("{}/token", server.url()))), Some(vault()));
    let location = callback_location(app, "code=abc&state=creator_42").await;

    assert!(location.contains("error=token_exchange_failed"));
}

#[tokio::test]
async fn test_successful_callback_seals_tokens() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/token")
        .with_status(200)
        .with_body(r#"{"access_token": "acc_1", "refresh_token": "ref_1", "expires_in": 3600}"#)
        .create_async()
        .await;

    let vault = vault();
    let app = create_test_app(
        Some(connector(format!("{}/token", server.url()))),
        Some(vault.clone()),
    );
    let location = callback_location(app, "code=abc&state=creator_42").await;

    assert!(location.contains("connected=creator_42&sync=start"));
    assert!(!location.contains("error="));
    mock.assert_async().await;

    let tokens = vault.open("creator_42").unwrap().unwrap();
    assert_eq!(tokens.access_token, "acc_1");
    assert_eq!(tokens.refresh_token.as_deref(), Some("ref_1"));
}

#[tokio::test]
async fn test_missing_vault_is_callback_failed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/token")
        .with_status(200)
        .with_body(r#"{"access_token": "acc_1"}"#)
        .create_async()
        .await;

    let app = create_test_app(Some(connector(format!("{}/token", server.url()))), None);
    let location = callback_location(app, "code=abc&state=creator_42").await;

    assert!(location.contains("error=callback_failed"));
}

#[tokio::test]
async fn test_public_url_prefixes_redirect() {
    let app = create_oauth_router(OAuthAppState {
        connector: None,
        vault: None,
        public_url: "https://crm.example.com".to_string(),
    });
    let location = callback_location(app, "error=access_denied").await;

    assert_eq!(location, "https://crm.example.com/creators?error=access_denied");
}
