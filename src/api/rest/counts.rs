//! Counter endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use super::{ApiError, ApiResponse};
use crate::api::websocket::events::CounterEvent;
use crate::api::websocket::state::AppState;
use crate::types::{GlobalCount, VisitorCount};

/// Reject ids that are empty or only whitespace
fn require_visitor_id(visitor_id: &str) -> Result<(), ApiError> {
    if visitor_id.trim().is_empty() {
        return Err(ApiError::bad_request("visitorId must not be empty"));
    }
    Ok(())
}

/// GET /api/global - Global feed total
pub async fn get_global(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let global = GlobalCount {
        total_feeds: state.store.global_count(),
    };
    Json(ApiResponse::new(global, state.current_sequence_id()))
}

/// GET /api/visitors/:visitor_id - One visitor's count (0 if never fed)
pub async fn get_visitor(
    State(state): State<Arc<AppState>>,
    Path(visitor_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_visitor_id(&visitor_id)?;

    let count = state.store.visitor_count(&visitor_id);
    let visitor = VisitorCount::new(visitor_id, count);
    Ok(Json(ApiResponse::new(visitor, state.current_sequence_id())))
}

/// POST /api/visitors/:visitor_id/feed - Increment visitor and global counts
///
/// Responds with no body; subscribers on `/ws` receive the new counts.
pub async fn feed_visitor(
    State(state): State<Arc<AppState>>,
    Path(visitor_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_visitor_id(&visitor_id)?;

    // The store fsyncs on every write. Publishing inside the commit keeps
    // sequence IDs in the same order as the totals they carry.
    let publisher = state.clone();
    tokio::task::spawn_blocking(move || {
        publisher.store.feed_with(&visitor_id, |outcome| {
            publisher.broadcast(CounterEvent::Fed(outcome.clone()))
        })
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "feed task failed");
        ApiError::internal("feed failed")
    })??;

    Ok(StatusCode::NO_CONTENT)
}

/// Response for GET /api/stats
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(rename = "totalFeeds")]
    pub total_feeds: u64,
    /// Number of distinct visitors that have fed at least once
    #[serde(rename = "visitorCount")]
    pub visitor_count: usize,
}

/// GET /api/stats - Store statistics
pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.store.snapshot();
    let stats = StatsResponse {
        total_feeds: snapshot.total_feeds,
        visitor_count: snapshot.visitors.len(),
    };
    Json(ApiResponse::new(stats, state.current_sequence_id()))
}
