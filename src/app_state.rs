//! Implements a struct that holds the state of the server.

use std::sync::Arc;

use crate::transaction::TransactionStore;

/// The state of the server.
///
/// Constructed once at process start, after the workbook connection has
/// been established, and cloned into every route handler. Handlers extract
/// the slice of state they need through `FromRef` impls on their own state
/// structs.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The transaction store backed by the workbook.
    pub store: Arc<TransactionStore>,

    /// The local timezone as a canonical timezone name, e.g.
    /// "America/Sao_Paulo".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] over an already-connected store.
    ///
    /// `local_timezone` should be a valid, canonical timezone name.
    pub fn new(store: TransactionStore, local_timezone: &str) -> Self {
        Self {
            store: Arc::new(store),
            local_timezone: local_timezone.to_owned(),
        }
    }
}
