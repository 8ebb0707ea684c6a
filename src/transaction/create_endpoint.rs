//! Defines the endpoint for creating a new transaction.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None
// instead of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error, endpoints,
    timezone::get_local_offset,
    transaction::{
        TransactionStore,
        model::{NewTransaction, Status, Transaction, TransactionKind},
    },
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The store for managing transactions.
    pub store: Arc<TransactionStore>,
    /// The local timezone as a canonical timezone name, e.g.
    /// "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub(crate) struct TransactionForm {
    /// Income or expense.
    pub kind: TransactionKind,
    /// The value of the transaction in reais.
    pub amount: f64,
    /// The date when the transaction occurred.
    pub date: Date,
    /// Text detailing the transaction.
    pub description: String,
    /// The category label.
    #[serde(default)]
    pub category: String,
    /// Whether the money has moved.
    pub status: Status,
    /// The account or payment method, if any.
    #[serde(default)]
    pub account: Option<String>,
}

impl TransactionForm {
    /// Convert the raw form values into store input, dropping a blank
    /// account field.
    pub(crate) fn into_new_transaction(self) -> NewTransaction {
        let account = self
            .account
            .filter(|account| !account.trim().is_empty());

        Transaction::build(self.kind, self.amount, self.date, &self.description)
            .category(&self.category)
            .status(self.status)
            .account(account)
    }
}

/// A route handler for creating a new transaction, redirects to the
/// transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let Some(local_timezone) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezone(state.local_timezone).into_alert_response();
    };

    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    if form.date > today {
        tracing::error!("tried to create a transaction with a future date");

        return Error::FutureDate(form.date).into_alert_response();
    }

    if let Err(error) = state.store.create(form.into_new_transaction()) {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
