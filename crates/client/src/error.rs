use showroom_core::types::DbId;

/// Errors from the admin client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        /// `error` from the response body, or the raw body.
        message: String,
    },

    /// A reorder is already in flight for this board.
    #[error("A reorder is already being submitted")]
    Busy,

    /// Drag indices outside the working set.
    #[error("Invalid move from {from} to {to} in a working set of {len}")]
    InvalidMove { from: usize, to: usize, len: usize },

    /// The working set names an item the board does not hold.
    #[error("Item {0} is not on the board")]
    UnknownItem(DbId),

    /// The working set no longer matches the board, e.g. because the
    /// submission queued ahead of it failed and the board was resynced.
    /// Nothing was submitted; take a fresh working set and drag again.
    #[error("Working set is out of date with the board")]
    StaleWorkingSet,

    /// Submitting a reorder failed; the optimistic order was discarded.
    ///
    /// `resynced` tells whether the board now shows the server's list
    /// (`true`) or the order from before the drag (`false`).
    #[error("Reorder failed (resynced: {resynced}): {source}")]
    ReorderFailed {
        #[source]
        source: Box<ClientError>,
        resynced: bool,
    },
}
