// Integration tests for the creator connect and sync-status endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use creator_crm::api::oauth::OAuthProviderConfig;
use creator_crm::api::{create_creator_router, CreatorAppState, OAuthConnector};
use creator_crm::rate_limit::RateLimiter;
use creator_crm::sync::{SyncStage, SyncStatusRecord, SyncStatusTracker};
use std::sync::Arc;
use tower::ServiceExt;

fn create_test_app(with_oauth: bool, tracker: Arc<SyncStatusTracker>) -> Router {
    let oauth = with_oauth.then(|| {
        Arc::new(OAuthConnector::new(
            OAuthProviderConfig::onlyfans("client_1", "secret_1"),
            "http://localhost:3000/api/auth/onlyfans/callback",
            Arc::new(RateLimiter::default()),
        ))
    });

    create_creator_router(CreatorAppState {
        oauth,
        sync_tracker: tracker,
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn connect_request(creator_id: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/creators/{}/connect", creator_id))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_connect_returns_auth_url() {
    let app = create_test_app(true, Arc::new(SyncStatusTracker::new()));
    let (status, json) = send(app, connect_request("creator_42", r#"{"ofUsername": "alice"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    let auth_url = json["authUrl"].as_str().unwrap();
    assert!(auth_url.starts_with("https://onlyfans.com/oauth/authorize?"));
    assert!(auth_url.contains("state=creator_42"));
    assert!(auth_url.contains("client_id=client_1"));
    assert!(json["message"].as_str().unwrap().contains("@alice"));
}

#[tokio::test]
async fn test_connect_requires_username() {
    let app = create_test_app(true, Arc::new(SyncStatusTracker::new()));
    let (status, json) = send(app, connect_request("creator_42", r#"{"ofUsername": "  "}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "OnlyFans username is required");
}

#[tokio::test]
async fn test_connect_rejects_malformed_json() {
    let app = create_test_app(true, Arc::new(SyncStatusTracker::new()));
    let (status, json) = send(app, connect_request("creator_42", "{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("Invalid JSON"));
}

#[tokio::test]
async fn test_connect_without_oauth_config_is_500() {
    let app = create_test_app(false, Arc::new(SyncStatusTracker::new()));
    let (status, json) = send(app, connect_request("creator_42", r#"{"ofUsername": "alice"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "OnlyFans OAuth is not configured");
}

#[tokio::test]
async fn test_sync_status_default_for_unknown_creator() {
    let app = create_test_app(false, Arc::new(SyncStatusTracker::new()));
    let (status, json) = send(
        app,
        Request::builder()
            .uri("/api/creators/creator_99/sync-status")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stage"], "pending");
    assert_eq!(json["progress"], 0);
    assert!(json["lastSyncAt"].is_null());
}

#[tokio::test]
async fn test_sync_status_reflects_tracker() {
    let tracker = Arc::new(SyncStatusTracker::new());
    tracker.update(
        "creator_42",
        SyncStatusRecord {
            stage: SyncStage::Syncing,
            message: "Fetching fans".to_string(),
            progress: 40,
            last_sync_at: None,
        },
    );

    let app = create_test_app(false, tracker);
    let (_, json) = send(
        app,
        Request::builder()
            .uri("/api/creators/creator_42/sync-status")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(json["stage"], "syncing");
    assert_eq!(json["message"], "Fetching fans");
    assert_eq!(json["progress"], 40);
}
