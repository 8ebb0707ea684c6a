//! Defines the route handler for the page that edits a transaction.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use time::OffsetDateTime;

use crate::{
    Error,
    category::category_options,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, currency_input_styles},
    navigation::NavBar,
    timezone::get_local_offset,
    transaction::{
        create_endpoint::CreateTransactionState,
        form::{TransactionFormDefaults, transaction_form_fields},
    },
};

/// Display the form for editing an existing transaction, pre-filled with
/// the row's current values.
///
/// Responds with the 404 page when no row has the requested id.
pub async fn get_edit_transaction_page(
    State(state): State<CreateTransactionState>,
    Path(transaction_id): Path<String>,
) -> Result<Response, Error> {
    let local_timezone = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezone(state.local_timezone.clone())
    })?;

    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    let transaction = state
        .store
        .load()
        .into_iter()
        .find(|transaction| transaction.id == transaction_id)
        .ok_or(Error::TransactionNotFound)?;

    let categories = category_options(&state.store.categories());

    let defaults = TransactionFormDefaults {
        kind: transaction.kind,
        amount: Some(transaction.amount),
        date: transaction.date,
        max_date: today,
        description: Some(&transaction.description),
        category: Some(&transaction.category),
        status: transaction.status,
        account: transaction.account.as_deref(),
    };

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, &transaction.id);

    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let content = html!(
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold leading-tight tracking-tight md:text-2xl my-4"
            {
                "Edit transaction"
            }

            p class="text-sm text-gray-600 dark:text-gray-400 mb-2" { (transaction.id) }

            form
                hx-put=(edit_endpoint)
                hx-target-error="#alert-container"
                class="space-y-4 w-full"
            {
                (transaction_form_fields(&defaults, &categories))

                button
                    type="submit"
                    class=(BUTTON_PRIMARY_STYLE)
                {
                    "Save changes"
                }
            }
        }
    );

    Ok(base("Edit Transaction", &[currency_input_styles()], &content).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use scraper::{Html, Selector};
    use tempfile::TempDir;
    use time::macros::date;

    use crate::{
        sheet::{ServiceCredentials, Workbook},
        transaction::{
            TransactionStore,
            create_endpoint::CreateTransactionState,
            model::{Status, Transaction, TransactionKind},
        },
    };

    use super::get_edit_transaction_page;

    fn get_test_state(dir: &TempDir) -> CreateTransactionState {
        let workbook_dir = dir.path().join("casa-teste");
        std::fs::create_dir(&workbook_dir).unwrap();
        let credentials = ServiceCredentials {
            client_email: "contas@example.iam.example.com".to_owned(),
            private_key: "key material".to_owned(),
            workbook_key: "casa-teste".to_owned(),
        };
        let workbook = Workbook::open(&workbook_dir, &credentials).unwrap();

        CreateTransactionState {
            store: Arc::new(TransactionStore::new(workbook)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn form_is_prefilled_and_puts_to_the_edit_endpoint() {
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

        let response =
            get_edit_transaction_page(State(state), Path(created.id.clone()))
                .await
                .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = Html::parse_document(&String::from_utf8_lossy(&body));

        let form_selector =
            Selector::parse(&format!("form[hx-put='/transactions/{}/edit']", created.id)).unwrap();
        assert!(html.select(&form_selector).next().is_some());

        let description_selector = Selector::parse("input[name='description']").unwrap();
        let description = html.select(&description_selector).next().unwrap();
        assert_eq!(description.attr("value"), Some("Feira"));

        let amount_selector = Selector::parse("input[name='amount']").unwrap();
        let amount = html.select(&amount_selector).next().unwrap();
        assert_eq!(amount.attr("value"), Some("245.90"));
    }

    #[tokio::test]
    async fn missing_id_responds_with_not_found() {
        let dir = TempDir::new().unwrap();
        let state = get_test_state(&dir);

        let response = get_edit_transaction_page(State(state), Path("TRX-20260101-0000".to_owned()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
