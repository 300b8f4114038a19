//! Display-order rules shared by the server and the admin client.
//!
//! `order` is a sort hint, not an identity: values may repeat or leave gaps.
//! Ties are broken by creation time, newest first.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, SortOrder, Timestamp};

/// One `{ id, order }` entry of a bulk reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPair {
    pub id: DbId,
    pub order: SortOrder,
}

/// Anything that can be placed in a display list.
pub trait Orderable {
    fn id(&self) -> DbId;
    fn order(&self) -> SortOrder;
    fn set_order(&mut self, order: SortOrder);
    fn created_at(&self) -> Timestamp;
}

/// Order assigned to a newly created entity: the number of entities already in
/// its scope, i.e. append to the end.
pub fn next_order(count_in_scope: i64) -> SortOrder {
    SortOrder::try_from(count_in_scope).unwrap_or(SortOrder::MAX)
}

/// `(order ascending, created_at descending)`, then id descending so the
/// result is total even for identical timestamps.
pub fn display_cmp<T: Orderable>(a: &T, b: &T) -> Ordering {
    a.order()
        .cmp(&b.order())
        .then_with(|| b.created_at().cmp(&a.created_at()))
        .then_with(|| b.id().cmp(&a.id()))
}

/// Sort in place by [`display_cmp`].
pub fn sort_for_display<T: Orderable>(items: &mut [T]) {
    items.sort_by(display_cmp);
}

/// Move the element at `from` to `to` by removing and re-inserting it, so
/// every element in between shifts by one. Not a swap.
///
/// Returns `None` when either index is out of range.
pub fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> Option<Vec<T>> {
    if from >= items.len() || to >= items.len() {
        return None;
    }
    let mut moved = items.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);
    Some(moved)
}

/// Assign `order = position` (0-based) to every id of a working set.
pub fn assign_positions(ids: &[DbId]) -> Vec<OrderPair> {
    ids.iter()
        .enumerate()
        .map(|(position, &id)| OrderPair {
            id,
            order: next_order(position as i64),
        })
        .collect()
}

/// Apply a reorder batch to an in-memory list.
///
/// Entries whose id is absent from `items` are skipped; items not named in
/// `pairs` keep their order. Returns how many items were updated.
pub fn apply_pairs<T: Orderable>(items: &mut [T], pairs: &[OrderPair]) -> usize {
    let mut updated = 0;
    for pair in pairs {
        if let Some(item) = items.iter_mut().find(|i| i.id() == pair.id) {
            item.set_order(pair.order);
            updated += 1;
        }
    }
    updated
}
