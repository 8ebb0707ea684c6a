//! Defines the endpoint for overwriting an existing transaction.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{AppState, endpoints, transaction::TransactionStore};

use super::create_endpoint::TransactionForm;

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The store for managing transactions.
    pub store: Arc<TransactionStore>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// A route handler that overwrites the transaction with the submitted
/// fields. The id never changes; everything else is replaced.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<String>,
    Form(form): Form<TransactionForm>,
) -> Response {
    if let Err(error) = state
        .store
        .update(&transaction_id, form.into_new_transaction())
    {
        tracing::error!("could not update transaction {transaction_id}: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use tempfile::TempDir;
    use time::macros::date;

    use crate::{
        sheet::{ServiceCredentials, Workbook},
        transaction::{
            TransactionStore,
            create_endpoint::TransactionForm,
            model::{Status, Transaction, TransactionKind},
        },
    };

    use super::{EditTransactionState, edit_transaction_endpoint};

    fn get_test_state(dir: &TempDir) -> EditTransactionState {
        let workbook_dir = dir.path().join("casa-teste");
        std::fs::create_dir(&workbook_dir).unwrap();
        let credentials = ServiceCredentials {
            client_email: "contas@example.iam.example.com".to_owned(),
            private_key: "key material".to_owned(),
            workbook_key: "casa-teste".to_owned(),
        };
        let workbook = Workbook::open(&workbook_dir, &credentials).unwrap();

        EditTransactionState {
            store: Arc::new(TransactionStore::new(workbook)),
        }
    }

    fn edit_form() -> TransactionForm {
        TransactionForm {
            kind: TransactionKind::Expense,
            amount: 199.9,
            date: date!(2026 - 03 - 12),
            description: "Feira (corrigida)".to_owned(),
            category: "Mercado".to_owned(),
            status: Status::Paid,
            account: None,
        }
    }

    #[tokio::test]
    async fn can_update_transaction() {
        let dir = TempDir::new().unwrap();
        let state = get_test_state(&dir);
        let created = state
            .store
            .create(
                Transaction::build(
                    TransactionKind::Expense,
                    245.9,
                    date!(2026 - 03 - 10),
                    "Feira",
                )
                .category("Mercado")
                .status(Status::Pending),
            )
            .unwrap();

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(created.id.clone()),
            Form(edit_form()),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            "/transactions"
        );

        let rows = state.store.load();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, created.id);
        assert_eq!(rows[0].description, "Feira (corrigida)");
        assert_eq!(rows[0].status, Status::Paid);
    }

    #[tokio::test]
    async fn missing_id_responds_not_found_and_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let state = get_test_state(&dir);

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path("TRX-20260101-0000".to_owned()),
            Form(edit_form()),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(state.store.load().len(), 0);
    }
}
