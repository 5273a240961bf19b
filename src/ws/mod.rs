//! WebSocket client library
//!
//! Provides a reusable WebSocket client with automatic fixed-delay
//! reconnection and ping/pong keepalive.

mod client;
mod types;

pub use client::WsClient;
pub use types::{WsConfig, WsError, WsMessage};
