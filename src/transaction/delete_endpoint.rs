//! Defines the endpoint for deleting a transaction.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{AppState, Error, transaction::TransactionStore};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    store: Arc<TransactionStore>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// A route handler for deleting a transaction.
///
/// On success the response body is empty so htmx removes the table row it
/// targeted; a missing row responds with a warning alert instead.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<String>,
) -> Response {
    match state.store.delete(&transaction_id) {
        // The status code has to be 200 OK or HTMX will not remove the
        // table row.
        Ok(()) => html! {}.into_response(),
        Err(error @ Error::TransactionNotFound) => {
            tracing::warn!("could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
