//! WebSocket event types for live counter updates

use serde::{Deserialize, Serialize};

use crate::types::FeedOutcome;

/// Counter events that can be broadcast to WebSocket clients
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CounterEvent {
    /// A visitor fed; carries the counts right after the increment
    Fed(FeedOutcome),
}

/// WebSocket message wrapper with metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WsMessage {
    #[serde(flatten)]
    pub event: CounterEvent,

    /// Monotonically increasing sequence ID for gap detection
    #[serde(rename = "sequenceId")]
    pub sequence_id: u64,

    /// Unix timestamp when event was created
    pub timestamp: i64,
}

/// Client message types
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ping for heartbeat
    Ping,
}

/// Welcome message sent on connection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(rename = "currentSequenceId")]
    pub current_sequence_id: u64,
    #[serde(rename = "totalFeeds")]
    pub total_feeds: u64,
}

impl WelcomeMessage {
    pub fn new(current_sequence_id: u64, total_feeds: u64) -> Self {
        Self {
            msg_type: "connected".to_string(),
            current_sequence_id,
            total_feeds,
        }
    }
}

/// Pong response message
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PongMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
}

impl Default for PongMessage {
    fn default() -> Self {
        Self {
            msg_type: "pong".to_string(),
        }
    }
}

/// Sent when a subscriber fell behind the broadcast buffer
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LaggedMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub code: String,
    pub message: String,
}

impl LaggedMessage {
    pub fn new(missed: u64) -> Self {
        Self {
            msg_type: "error".to_string(),
            code: "lagged".to_string(),
            message: format!("Missed {} events, please refresh", missed),
        }
    }
}
