//! Price filtering and candidate capping

use crate::models::{PriceWindow, Priced};

/// Keep items whose price lies in `window`, sorted ascending by price.
///
/// The sort is stable: items with equal prices keep their upstream order.
pub fn filter_by_price<T: Priced>(items: Vec<T>, window: &PriceWindow) -> Vec<T> {
    let mut kept: Vec<T> = items
        .into_iter()
        .filter(|item| window.contains(item.price()))
        .collect();
    kept.sort_by_key(|item| item.price());
    kept
}

/// Truncate a price-sorted list to its first `cap` entries.
pub fn cap_candidates<T>(mut items: Vec<T>, cap: usize) -> Vec<T> {
    items.truncate(cap);
    items
}
