//! HTTP and live-update tests driven through the router

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tempfile::TempDir;
use tower::util::ServiceExt;

use feed_counter::api::http::create_router;
use feed_counter::api::websocket::events::CounterEvent;
use feed_counter::api::websocket::state::AppState;
use feed_counter::CounterStore;

fn setup_state(capacity: usize) -> (Arc<AppState>, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = CounterStore::open(dir.path().join("feeds.jsonl")).unwrap();
    let state = Arc::new(AppState::with_capacity(Arc::new(store), capacity));
    (state, dir)
}

fn feed_request(visitor_id: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/visitors/{}/feed", visitor_id))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_feeds_broadcast_in_commit_order() {
    let (state, _dir) = setup_state(1024);
    let mut rx = state.subscribe();

    let tasks: Vec<_> = (0..400)
        .map(|i| {
            let app = create_router(state.clone());
            tokio::spawn(async move {
                let response = app.oneshot(feed_request(&format!("v{}", i % 4))).await.unwrap();
                assert_eq!(response.status(), StatusCode::NO_CONTENT);
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let mut previous_total = 0;
    for expected_seq in 0..400u64 {
        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.sequence_id, expected_seq);
        let CounterEvent::Fed(outcome) = msg.event;
        assert!(
            outcome.total_feeds > previous_total,
            "seq {} carried totalFeeds {} after {}",
            msg.sequence_id,
            outcome.total_feeds,
            previous_total
        );
        assert_eq!(outcome.total_feeds, expected_seq + 1);
        previous_total = outcome.total_feeds;
    }

    assert_eq!(state.store.global_count(), 400);
    for v in 0..4 {
        assert_eq!(state.store.visitor_count(&format!("v{}", v)), 100);
    }
}

#[tokio::test]
async fn test_failed_feed_is_not_broadcast() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("feeds.jsonl");
    let store = Arc::new(CounterStore::open(&path).unwrap());
    // A non-empty directory at the store path makes every write fail
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("occupied"), "x").unwrap();
    let state = Arc::new(AppState::new(store));

    let response = create_router(state.clone())
        .oneshot(feed_request("v1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(!body.contains(dir.path().to_string_lossy().as_ref()));
    assert_eq!(state.current_sequence_id(), 0);
    assert_eq!(state.store.global_count(), 0);
}
