//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::broadcast;

use super::events::{ClientMessage, LaggedMessage, PongMessage, WelcomeMessage, WsMessage};
use super::state::AppState;

/// What to do with one item from the broadcast receiver
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Outbound {
    /// Send this text frame
    Frame(String),
    /// Nothing to send
    Skip,
    /// The channel is gone, end the session
    Close,
}

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    // Subscribe before reading counts so no feed slips between the two
    let mut rx = state.subscribe();
    tracing::debug!("websocket client connected");

    if let Some(welcome) = welcome_frame(&state) {
        if socket.send(Message::Text(welcome)).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match outbound_frame(result) {
                    Outbound::Frame(json) => {
                        if socket.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Outbound::Skip => {}
                    Outbound::Close => break,
                }
            }

            result = socket.recv() => {
                match result {
                    Some(Ok(msg)) => {
                        if !handle_client_message(msg, &mut socket).await {
                            break;
                        }
                    }
                    Some(Err(_)) | None => break,
                }
            }
        }
    }

    tracing::debug!("websocket client disconnected");
}

/// `connected` frame with the current sequence ID and global total
pub(crate) fn welcome_frame(state: &AppState) -> Option<String> {
    encode(&WelcomeMessage::new(
        state.current_sequence_id(),
        state.store.global_count(),
    ))
}

/// Map a broadcast receive result to the frame the client should get
pub(crate) fn outbound_frame(result: Result<WsMessage, broadcast::error::RecvError>) -> Outbound {
    let frame = match result {
        Ok(msg) => encode(&msg),
        Err(broadcast::error::RecvError::Lagged(n)) => {
            tracing::debug!(missed = n, "websocket client lagged");
            encode(&LaggedMessage::new(n))
        }
        Err(broadcast::error::RecvError::Closed) => return Outbound::Close,
    };
    frame.map_or(Outbound::Skip, Outbound::Frame)
}

/// Reply to a client text frame, if it warrants one
pub(crate) fn reply_to_text(text: &str) -> Option<String> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Ping) => encode(&PongMessage::default()),
        Err(_) => None,
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode websocket frame");
            None
        }
    }
}

/// Handle a message from the client
/// Returns false if the connection should be closed
async fn handle_client_message(msg: Message, socket: &mut WebSocket) -> bool {
    match msg {
        Message::Text(text) => match reply_to_text(&text) {
            Some(reply) => socket.send(Message::Text(reply)).await.is_ok(),
            None => true,
        },
        Message::Binary(_) => true,
        Message::Ping(data) => socket.send(Message::Pong(data)).await.is_ok(),
        Message::Pong(_) => true,
        Message::Close(_) => false,
    }
}
