//! WebSocket module for live counter updates
//!
//! Provides the `/ws` endpoint. Every successful feed is pushed to all
//! connected clients as a `fed` event carrying the new counts and a
//! sequence ID for gap detection.

pub mod events;
pub mod handler;
pub mod state;
