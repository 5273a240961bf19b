//! Transient price and rank change markers
//!
//! Deltas only drive highlighting. They expire on their own and never feed
//! back into the snapshot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Direction of a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Direction of a price move, `None` when unchanged
    pub fn of_price(previous: Decimal, current: Decimal) -> Option<Self> {
        match current.cmp(&previous) {
            std::cmp::Ordering::Greater => Some(Direction::Up),
            std::cmp::Ordering::Less => Some(Direction::Down),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// An item's price changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceDelta {
    pub direction: Direction,
    pub timestamp: DateTime<Utc>,
}

/// An item's rank changed between two consecutive sorts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PositionDelta {
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
}

impl PositionDelta {
    /// Moving towards rank 0 is `Up`
    pub fn new(from: usize, to: usize) -> Self {
        let direction = if to < from {
            Direction::Up
        } else {
            Direction::Down
        };
        Self {
            from,
            to,
            direction,
        }
    }

    /// Number of places moved
    pub fn distance(&self) -> usize {
        self.from.abs_diff(self.to)
    }
}

/// Active deltas with their expiry deadlines
#[derive(Debug)]
pub struct DeltaBoard {
    price_window: Duration,
    position_window: Duration,
    prices: HashMap<String, (PriceDelta, Instant)>,
    positions: HashMap<String, PositionDelta>,
    positions_expire_at: Option<Instant>,
}

impl DeltaBoard {
    pub fn new(price_window: Duration, position_window: Duration) -> Self {
        Self {
            price_window,
            position_window,
            prices: HashMap::new(),
            positions: HashMap::new(),
            positions_expire_at: None,
        }
    }

    /// Flag a price change; a newer change for the same item restarts its window
    pub fn record_price(&mut self, identifier: String, direction: Direction, now: Instant) {
        let delta = PriceDelta {
            direction,
            timestamp: Utc::now(),
        };
        self.prices
            .insert(identifier, (delta, now + self.price_window));
    }

    /// Flag one batch of rank changes
    ///
    /// A non-empty batch replaces the previous batch and all of its entries
    /// expire together. An empty batch leaves the current markers alone.
    pub fn record_positions(&mut self, batch: Vec<(String, PositionDelta)>, now: Instant) {
        if batch.is_empty() {
            return;
        }
        self.positions = batch.into_iter().collect();
        self.positions_expire_at = Some(now + self.position_window);
    }

    /// Drop everything whose window has elapsed; returns whether anything changed
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.prices.len();
        self.prices.retain(|_, (_, deadline)| *deadline > now);
        let mut changed = self.prices.len() != before;

        if matches!(self.positions_expire_at, Some(deadline) if deadline <= now) {
            changed |= !self.positions.is_empty();
            self.positions.clear();
            self.positions_expire_at = None;
        }
        changed
    }

    /// Earliest pending deadline
    pub fn next_expiry(&self) -> Option<Instant> {
        self.prices
            .values()
            .map(|(_, deadline)| *deadline)
            .chain(self.positions_expire_at)
            .min()
    }

    pub fn price_deltas(&self) -> HashMap<String, PriceDelta> {
        self.prices
            .iter()
            .map(|(id, (delta, _))| (id.clone(), *delta))
            .collect()
    }

    pub fn position_deltas(&self) -> HashMap<String, PositionDelta> {
        self.positions.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty() && self.positions.is_empty()
    }
}
