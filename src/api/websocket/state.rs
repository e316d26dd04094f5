//! Shared application state

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::events::{CounterEvent, WsMessage};
use crate::store::CounterStore;

/// Default live-update buffer; slower clients get a `lagged` notice
pub const DEFAULT_BROADCAST_CAPACITY: usize = 1024;

/// Shared application state for HTTP handlers and WebSocket connections
pub struct AppState {
    /// The counter store
    pub store: Arc<CounterStore>,

    /// Broadcast channel for sending events to all connected clients
    pub event_tx: broadcast::Sender<WsMessage>,

    /// Monotonically increasing sequence counter
    pub sequence_counter: AtomicU64,
}

impl AppState {
    /// Create a new AppState with the default broadcast capacity
    pub fn new(store: Arc<CounterStore>) -> Self {
        Self::with_capacity(store, DEFAULT_BROADCAST_CAPACITY)
    }

    /// Create a new AppState with a custom broadcast capacity
    pub fn with_capacity(store: Arc<CounterStore>, capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(capacity.max(1));

        Self {
            store,
            event_tx,
            sequence_counter: AtomicU64::new(0),
        }
    }

    /// Broadcast a counter event to all connected WebSocket clients
    pub fn broadcast(&self, event: CounterEvent) {
        let seq = self.sequence_counter.fetch_add(1, Ordering::SeqCst);
        let msg = WsMessage {
            event,
            sequence_id: seq,
            timestamp: chrono::Utc::now().timestamp(),
        };

        // Ignore send errors - they just mean no receivers are listening
        let _ = self.event_tx.send(msg);
    }

    /// Get the current sequence ID
    pub fn current_sequence_id(&self) -> u64 {
        self.sequence_counter.load(Ordering::SeqCst)
    }

    /// Subscribe to receive broadcast events
    pub fn subscribe(&self) -> broadcast::Receiver<WsMessage> {
        self.event_tx.subscribe()
    }
}
