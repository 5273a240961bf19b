//! Aggregates shown above the list

use crate::item::Item;
use rust_decimal::Decimal;

/// Count, mean price and max price of a snapshot
///
/// Recomputed from the full item list on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListStats {
    pub count: usize,
    pub average: Decimal,
    pub max: Decimal,
}

impl ListStats {
    pub fn from_items(items: &[Item]) -> Self {
        if items.is_empty() {
            return Self::default();
        }

        let count = Decimal::from(items.len());
        let max = items
            .iter()
            .map(Item::price)
            .max()
            .unwrap_or(Decimal::ZERO);

        // Sum first for an exact mean; near Decimal::MAX the total overflows,
        // so divide each price before adding instead
        let average = items
            .iter()
            .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.price()))
            .and_then(|total| total.checked_div(count))
            .or_else(|| {
                items.iter().try_fold(Decimal::ZERO, |mean, item| {
                    mean.checked_add(item.price().checked_div(count)?)
                })
            })
            .unwrap_or(max);

        Self {
            count: items.len(),
            average,
            max,
        }
    }
}
