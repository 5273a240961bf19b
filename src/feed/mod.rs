//! Item feed module
//!
//! Keeps a ranked, deduplicated snapshot of a backend collection current
//! from one bulk read plus a live broker subscription, and derives the
//! transient price and rank deltas the list screen highlights.

mod client;
mod deltas;
mod snapshot;
mod types;

pub use client::{FeedClient, FeedOptions};
pub use deltas::{DeltaBoard, Direction, PositionDelta, PriceDelta};
pub use snapshot::{FeedSnapshot, UpdateOutcome};
pub use types::{ConnectionStatus, FeedView};
