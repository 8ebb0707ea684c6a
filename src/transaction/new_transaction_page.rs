//! Defines the route handler for the page that records a new transaction.

use axum::{
    extract::State,
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
        model::{Status, TransactionKind},
    },
};

/// Display the form for recording a new transaction.
pub async fn get_new_transaction_page(
    State(state): State<CreateTransactionState>,
) -> Result<Response, Error> {
    let local_timezone = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezone(state.local_timezone.clone())
    })?;

    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();
    let categories = category_options(&state.store.categories());

    let defaults = TransactionFormDefaults {
        kind: TransactionKind::Expense,
        amount: None,
        date: today,
        max_date: today,
        description: None,
        category: None,
        status: Status::Paid,
        account: None,
    };

    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let content = html!(
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold leading-tight tracking-tight md:text-2xl my-4"
            {
                "New transaction"
            }

            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target-error="#alert-container"
                class="space-y-4 w-full"
            {
                (transaction_form_fields(&defaults, &categories))

                button
                    type="submit"
                    class=(BUTTON_PRIMARY_STYLE)
                {
                    "Save"
                }
            }
        }
    );

    Ok(base("New Transaction", &[currency_input_styles()], &content).into_response())
}
