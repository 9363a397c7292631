// Integration tests for outbound request spacing
//
// Timing tests run on a paused tokio clock, so spacing is checked exactly
// rather than against wall-clock jitter.

use creator_crm::onlyfans::{OnlyFansClient, RequestOptions};
use creator_crm::rate_limit::{RateLimiter, DEFAULT_REQUEST_SPACING};
use mockito::Server;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_sequential_calls_are_spaced() {
    let limiter = RateLimiter::default();
    let mut starts = Vec::new();

    for _ in 0..5 {
        limiter.acquire_slot().await;
        starts.push(Instant::now());
    }

    for pair in starts.windows(2) {
        assert!(pair[1] - pair[0] >= DEFAULT_REQUEST_SPACING);
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_callers_are_serialized() {
    let limiter = Arc::new(RateLimiter::new(Duration::from_millis(250)));
    let starts = Arc::new(Mutex::new(Vec::new()));

    let tasks = (0..6).map(|_| {
        let limiter = Arc::clone(&limiter);
        let starts = Arc::clone(&starts);
        tokio::spawn(async move {
            limiter.acquire_slot().await;
            starts.lock().unwrap().push(Instant::now());
        })
    });
    for result in futures::future::join_all(tasks).await {
        result.unwrap();
    }

    let mut starts = starts.lock().unwrap().clone();
    starts.sort();
    assert_eq!(starts.len(), 6);
    for pair in starts.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(250));
    }
    // Six slots need exactly five full gaps
    assert_eq!(starts[5] - starts[0], Duration::from_millis(1250));
}

#[tokio::test]
async fn test_client_requests_pass_through_limiter() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/fans")
        .with_status(200)
        .with_body("[]")
        .expect(3)
        .create_async()
        .await;

    let spacing = Duration::from_millis(100);
    let client = OnlyFansClient::new(server.url(), None, Arc::new(RateLimiter::new(spacing))).unwrap();

    let start = std::time::Instant::now();
    for _ in 0..3 {
        let _: Vec<serde_json::Value> = client
            .request("/fans", RequestOptions::default(), Some("tok"))
            .await
            .unwrap();
    }

    // Three calls: the first is immediate, the next two wait a full interval
    assert!(start.elapsed() >= spacing * 2);
    mock.assert_async().await;
}
