//! STOMP messaging
//!
//! Text-frame codec and a single-topic subscriber running on top of the
//! reconnecting WebSocket client.

mod frame;
mod subscriber;

pub use frame::{decode, Command, Frame, FrameError};
pub use subscriber::{StompConfig, StompEvent, StompSubscriber};
