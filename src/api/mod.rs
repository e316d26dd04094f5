//! API module for HTTP and WebSocket endpoints
//!
//! REST endpoints for reading and feeding counters, plus WebSocket live
//! updates for the page.

pub mod http;
pub mod rest;
pub mod websocket;
