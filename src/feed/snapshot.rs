//! Ranked, deduplicated item snapshot

use super::deltas::{Direction, PositionDelta};
use crate::item::Item;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// What a single update changed
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    /// The identifier was not in the snapshot before
    pub inserted: bool,
    /// Price direction of the updated item, when a previous price was recorded and differs
    pub price_direction: Option<Direction>,
    /// Every item whose rank moved in this re-sort
    pub position_deltas: Vec<(String, PositionDelta)>,
}

/// Items sorted by price descending, at most one per identifier
///
/// Sorting is stable: equal prices keep their prior relative order and a
/// newly arrived item lands after existing items of the same price.
#[derive(Debug, Default, Clone)]
pub struct FeedSnapshot {
    items: Vec<Item>,
    prev_prices: HashMap<String, Decimal>,
    prev_ranks: HashMap<String, usize>,
}

impl FeedSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, identifier: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.identifier() == identifier)
    }

    /// Rank index of an item
    pub fn rank_of(&self, identifier: &str) -> Option<usize> {
        self.items.iter().position(|i| i.identifier() == identifier)
    }

    /// Replace everything with a fresh bulk read and reset the delta baseline
    ///
    /// Duplicate identifiers within the read are merged in arrival order.
    pub fn replace_all(&mut self, items: Vec<Item>) {
        let mut fresh: Vec<Item> = Vec::with_capacity(items.len());
        for item in items {
            match fresh.iter_mut().find(|i| i.identifier() == item.identifier()) {
                Some(existing) => existing.merge(item),
                None => fresh.push(item),
            }
        }

        self.items = fresh;
        sort_by_price(&mut self.items);
        self.record_baseline();
    }

    /// Merge or append one item, re-sort, and report what moved
    pub fn apply(&mut self, update: Item) -> UpdateOutcome {
        let identifier = update.identifier().to_string();

        let inserted = match self.items.iter_mut().find(|i| i.identifier() == identifier) {
            Some(existing) => {
                existing.merge(update);
                false
            }
            None => {
                self.items.push(update);
                true
            }
        };

        sort_by_price(&mut self.items);

        let price_direction = match (self.prev_prices.get(&identifier), self.get(&identifier)) {
            (Some(previous), Some(current)) => Direction::of_price(*previous, current.price()),
            _ => None,
        };

        let position_deltas = self
            .items
            .iter()
            .enumerate()
            .filter_map(|(to, item)| {
                let from = *self.prev_ranks.get(item.identifier())?;
                (from != to).then(|| (item.identifier().to_string(), PositionDelta::new(from, to)))
            })
            .collect();

        self.record_baseline();

        UpdateOutcome {
            inserted,
            price_direction,
            position_deltas,
        }
    }

    /// Remember every item's current price and rank for the next comparison
    fn record_baseline(&mut self) {
        self.prev_prices.clear();
        self.prev_ranks.clear();
        for (rank, item) in self.items.iter().enumerate() {
            self.prev_prices
                .insert(item.identifier().to_string(), item.price());
            self.prev_ranks.insert(item.identifier().to_string(), rank);
        }
    }
}

fn sort_by_price(items: &mut [Item]) {
    items.sort_by(|a, b| b.price().cmp(&a.price()));
}
