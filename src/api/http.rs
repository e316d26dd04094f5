//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::rest::counts;
use super::websocket::{handler::ws_handler, state::AppState};

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // The page is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_check))
        .route("/api/global", get(counts::get_global))
        .route("/api/stats", get(counts::get_stats))
        .route("/api/visitors/:visitor_id", get(counts::get_visitor))
        .route("/api/visitors/:visitor_id/feed", post(counts::feed_visitor))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CounterStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    fn test_state(dir: &TempDir) -> Arc<AppState> {
        let store = CounterStore::open(dir.path().join("feeds.jsonl")).unwrap();
        Arc::new(AppState::new(Arc::new(store)))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(&dir));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_feed_then_read() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);

        let response = create_router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/visitors/v1/feed")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = create_router(state.clone())
            .oneshot(Request::builder().uri("/api/visitors/v1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["visitorId"], "v1");
        assert_eq!(json["data"]["count"], 1);
        assert_eq!(json["sequenceId"], 1);

        let response = create_router(state)
            .oneshot(Request::builder().uri("/api/global").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["data"]["totalFeeds"], 1);
    }

    #[tokio::test]
    async fn test_unknown_visitor_reads_zero() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(&dir));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/visitors/nobody")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["data"]["count"], 0);
    }

    #[tokio::test]
    async fn test_blank_visitor_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);

        let response = create_router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/visitors/%20/feed")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST");
        assert_eq!(state.store.global_count(), 0);
        assert_eq!(state.current_sequence_id(), 0);
    }

    #[tokio::test]
    async fn test_feed_is_broadcast() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        let mut rx = state.subscribe();

        create_router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/visitors/v9/feed")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let msg = rx.recv().await.unwrap();
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "fed");
        assert_eq!(json["visitorId"], "v9");
        assert_eq!(json["visitorCount"], 1);
        assert_eq!(json["totalFeeds"], 1);
    }

    #[tokio::test]
    async fn test_stats() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        state.store.increment_for_visitor("a").unwrap();
        state.store.increment_for_visitor("b").unwrap();
        state.store.increment_for_visitor("a").unwrap();

        let response = create_router(state)
            .oneshot(Request::builder().uri("/api/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["data"]["totalFeeds"], 3);
        assert_eq!(json["data"]["visitorCount"], 2);
    }
}
