//! Feed state handed to the list screen

use super::deltas::{PositionDelta, PriceDelta};
use crate::item::Item;
use serde::Serialize;
use std::collections::HashMap;

/// Broker connection state as shown to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Waiting for the broker, either first connect or a retry
    #[default]
    Connecting,
    /// Subscribed and receiving updates
    Connected,
    /// Broker reported an error or the transport gave up
    Error,
}

/// Immutable picture of a feed after one mutation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedView {
    /// Items ranked by price, highest first
    pub items: Vec<Item>,
    pub status: ConnectionStatus,
    /// Active price flashes keyed by identifier
    pub price_deltas: HashMap<String, PriceDelta>,
    /// Active rank moves keyed by identifier
    pub position_deltas: HashMap<String, PositionDelta>,
}

impl FeedView {
    pub fn price_delta(&self, identifier: &str) -> Option<&PriceDelta> {
        self.price_deltas.get(identifier)
    }

    pub fn position_delta(&self, identifier: &str) -> Option<&PositionDelta> {
        self.position_deltas.get(identifier)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
