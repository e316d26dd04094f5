//! REST API module for HTTP endpoints
//!
//! - `GET /api/global` - Global feed total
//! - `GET /api/visitors/:visitor_id` - One visitor's count
//! - `POST /api/visitors/:visitor_id/feed` - Record a feed
//! - `GET /api/stats` - Store statistics

pub mod counts;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Current sequence ID, matches the `/ws` event stream
    #[serde(rename = "sequenceId")]
    pub sequence_id: u64,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, sequence_id: u64) -> Self {
        Self { data, sequence_id }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "INTERNAL_ERROR".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Store details (paths, OS messages) go to the log, not the client
impl From<crate::error::StoreError> for ApiError {
    fn from(e: crate::error::StoreError) -> Self {
        tracing::error!(error = %e, "store operation failed");
        ApiError::internal("storage error")
    }
}
