//! Client half of the reorder protocol.
//!
//! ```text
//! Idle -> Dragging -> Submitting -> (Committed | Reverting) -> Idle
//! ```
//!
//! A drag rearranges the *working set* (the ids currently visible, e.g. one
//! gallery category) with a remove-and-reinsert move and assigns
//! `order = position` across that set only. The board shows the new order
//! immediately and submits every pair of the working set in one request.
//! Only one submission per board is in flight at a time: [`ReorderBoard::drag_end`]
//! waits for the previous one, [`ReorderBoard::try_drag_end`] refuses.
//!
//! On failure the optimistic order is thrown away and the list is refetched;
//! if that also fails, the pre-drag list is restored. A partial batch is never
//! retried: a drag queued behind a failed submission was computed from the
//! discarded order, so it is refused with [`ClientError::StaleWorkingSet`].

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use showroom_core::collection::Collection;
use showroom_core::ordering::{apply_pairs, assign_positions, move_item, sort_for_display, OrderPair};
use showroom_core::types::DbId;
use tokio::sync::MutexGuard as GateGuard;

use crate::api::OrderedItem;
use crate::error::ClientError;

/// Where the board reads the canonical list from and sends reorders to.
pub trait OrderingBackend: Send + Sync {
    /// Every item of `collection`, in any order.
    fn fetch_items(
        &self,
        collection: Collection,
    ) -> impl Future<Output = Result<Vec<OrderedItem>, ClientError>> + Send;

    /// Submit one bulk reorder.
    fn submit_orders(
        &self,
        collection: Collection,
        orders: &[OrderPair],
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// Where a board is in the reorder cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderState {
    Idle,
    Dragging,
    Submitting,
    Committed,
    Reverting,
}

/// Optimistically reordered view of one collection.
pub struct ReorderBoard<B> {
    backend: B,
    collection: Collection,
    items: Mutex<Vec<OrderedItem>>,
    state: Mutex<ReorderState>,
    /// Held for the whole submit/revert cycle.
    in_flight: tokio::sync::Mutex<()>,
}

/// `working_set` lists distinct board items in the board's current
/// relative order.
fn matches_board(items: &[OrderedItem], working_set: &[DbId]) -> bool {
    let mut on_board = items
        .iter()
        .map(|item| item.id)
        .filter(|id| working_set.contains(id));
    working_set.iter().all(|id| on_board.next() == Some(*id)) && on_board.next().is_none()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<B: OrderingBackend> ReorderBoard<B> {
    /// Fetch the collection and build a board in display order.
    pub async fn load(backend: B, collection: Collection) -> Result<Self, ClientError> {
        let mut items = backend.fetch_items(collection).await?;
        sort_for_display(&mut items);
        tracing::debug!(%collection, count = items.len(), "Loaded reorder board");
        Ok(Self {
            backend,
            collection,
            items: Mutex::new(items),
            state: Mutex::new(ReorderState::Idle),
            in_flight: tokio::sync::Mutex::new(()),
        })
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn state(&self) -> ReorderState {
        *lock(&self.state)
    }

    /// Snapshot of the list in display order.
    pub fn items(&self) -> Vec<OrderedItem> {
        lock(&self.items).clone()
    }

    /// Ids in display order, optionally limited to one value of a string
    /// field (e.g. `category`).
    pub fn working_set(&self, filter: Option<(&str, &str)>) -> Vec<DbId> {
        lock(&self.items)
            .iter()
            .filter(|item| match filter {
                Some((field, value)) => item.text(field) == Some(value),
                None => true,
            })
            .map(|item| item.id)
            .collect()
    }

    /// Mark a drag as started. Ignored while a submission is in flight.
    pub fn begin_drag(&self) {
        let mut state = lock(&self.state);
        if *state == ReorderState::Idle {
            *state = ReorderState::Dragging;
        }
    }

    /// Finish a drag, waiting for any in-flight submission first.
    pub async fn drag_end(
        &self,
        working_set: &[DbId],
        from: usize,
        to: usize,
    ) -> Result<(), ClientError> {
        let gate = self.in_flight.lock().await;
        self.submit(gate, working_set, from, to).await
    }

    /// Finish a drag, or fail with [`ClientError::Busy`] if a submission is
    /// already in flight.
    pub async fn try_drag_end(
        &self,
        working_set: &[DbId],
        from: usize,
        to: usize,
    ) -> Result<(), ClientError> {
        let gate = self.in_flight.try_lock().map_err(|_| ClientError::Busy)?;
        self.submit(gate, working_set, from, to).await
    }

    async fn submit(
        &self,
        _gate: GateGuard<'_, ()>,
        working_set: &[DbId],
        from: usize,
        to: usize,
    ) -> Result<(), ClientError> {
        let collection = self.collection;

        let Some(moved) = move_item(working_set, from, to) else {
            self.set_state(ReorderState::Idle);
            return Err(ClientError::InvalidMove {
                from,
                to,
                len: working_set.len(),
            });
        };
        let pairs = assign_positions(&moved);

        // Optimistic update.
        let snapshot = {
            let mut items = lock(&self.items);
            let unknown = moved
                .iter()
                .copied()
                .find(|id| !items.iter().any(|i| i.id == *id));
            if let Some(unknown) = unknown {
                drop(items);
                self.set_state(ReorderState::Idle);
                return Err(ClientError::UnknownItem(unknown));
            }
            if !matches_board(&items, working_set) {
                drop(items);
                tracing::warn!(%collection, "Working set is stale, not submitting");
                self.set_state(ReorderState::Idle);
                return Err(ClientError::StaleWorkingSet);
            }
            let snapshot = items.clone();
            apply_pairs(&mut items, &pairs);
            sort_for_display(&mut items);
            snapshot
        };
        self.set_state(ReorderState::Submitting);

        match self.backend.submit_orders(collection, &pairs).await {
            Ok(()) => {
                self.set_state(ReorderState::Committed);
                tracing::debug!(%collection, pairs = pairs.len(), "Reorder committed");
                self.set_state(ReorderState::Idle);
                Ok(())
            }
            Err(error) => {
                self.set_state(ReorderState::Reverting);
                tracing::warn!(%collection, error = %error, "Reorder failed, resyncing");
                let resynced = self.resync(snapshot).await;
                self.set_state(ReorderState::Idle);
                Err(ClientError::ReorderFailed {
                    source: Box::new(error),
                    resynced,
                })
            }
        }
    }

    /// Replace the list with the server's; fall back to `snapshot`.
    async fn resync(&self, snapshot: Vec<OrderedItem>) -> bool {
        match self.backend.fetch_items(self.collection).await {
            Ok(mut fresh) => {
                sort_for_display(&mut fresh);
                *lock(&self.items) = fresh;
                true
            }
            Err(e) => {
                tracing::warn!(
                    collection = %self.collection,
                    error = %e,
                    "Refetch failed, restoring previous order",
                );
                *lock(&self.items) = snapshot;
                false
            }
        }
    }

    fn set_state(&self, next: ReorderState) {
        *lock(&self.state) = next;
    }
}
