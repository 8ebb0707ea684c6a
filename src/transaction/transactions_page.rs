//! Defines the route handler for the page that lists transactions with
//! inline edit and delete actions.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, link,
        period_picker,
    },
    metrics::{filter_by_period, periods_of, selected_period, sort_for_action},
    navigation::NavBar,
    timezone::get_local_offset,
    transaction::{
        TransactionStore,
        model::{Transaction, TransactionKind},
    },
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The store for managing transactions.
    store: Arc<TransactionStore>,
    /// The local timezone as a canonical timezone name.
    local_timezone: String,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters of the transactions page.
#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    /// The selected period as `YYYY-MM`, or "all".
    period: Option<String>,
}

/// Display the transactions for the selected period, ordered so actionable
/// rows come first.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let local_timezone = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezone(state.local_timezone.clone())
    })?;

    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    let all_transactions = state.store.load();
    let periods = periods_of(&all_transactions);
    let period = selected_period(query.period.as_deref(), today);

    let mut transactions = match period {
        Some(period) => filter_by_period(&all_transactions, period),
        None => all_transactions,
    };
    sort_for_action(&mut transactions);

    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW);
    let picker = period_picker(endpoints::TRANSACTIONS_VIEW, &periods, period);

    Ok(transactions_view(nav_bar, picker, &transactions).into_response())
}

fn transactions_view(
    nav_bar: NavBar<'_>,
    picker: Markup,
    transactions: &[Transaction],
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                (picker)

                @if transactions.is_empty() {
                    p class="my-8"
                    {
                        "No transactions in this period. Record one "
                        (link(endpoints::NEW_TRANSACTION_VIEW, "here"))
                        "."
                    }
                } @else {
                    div class="overflow-x-auto rounded-lg shadow"
                    {
                        table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Account" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                                }
                            }

                            tbody
                            {
                                @for transaction in transactions {
                                    (transaction_row(transaction))
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Transactions", &[], &content)
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, &transaction.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, &transaction.id);

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE)
            {
                @if !transaction.category.is_empty() {
                    span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
                }
            }
            td class={(TABLE_CELL_STYLE) " whitespace-nowrap " (amount_color(transaction))}
            {
                (signed_amount(transaction))
            }
            td class=(TABLE_CELL_STYLE) { (transaction.status) }
            td class=(TABLE_CELL_STYLE) { (transaction.account.as_deref().unwrap_or("")) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        type="button"
                        hx-delete=(delete_url)
                        hx-target="closest tr"
                        hx-swap="outerHTML"
                        hx-confirm="Delete this transaction?"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    )
}

fn amount_color(transaction: &Transaction) -> &'static str {
    match transaction.kind {
        TransactionKind::Income => "text-green-600 dark:text-green-400",
        TransactionKind::Expense => "text-red-600 dark:text-red-400",
    }
}

fn signed_amount(transaction: &Transaction) -> String {
    match transaction.kind {
        TransactionKind::Income => format_currency(transaction.amount),
        TransactionKind::Expense => format_currency(-transaction.amount),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        extract::{Query, State},
        http::{Response, StatusCode},
    };
    use scraper::{Html, Selector};
    use tempfile::TempDir;
    use time::{Duration, OffsetDateTime};

    use crate::{
        sheet::{ServiceCredentials, Workbook},
        transaction::{
            TransactionStore,
            model::{Status, Transaction, TransactionKind},
        },
    };

    use super::{TransactionsQuery, TransactionsViewState, get_transactions_page};

    fn get_test_state(dir: &TempDir) -> TransactionsViewState {
        let workbook_dir = dir.path().join("casa-teste");
        std::fs::create_dir(&workbook_dir).unwrap();
        let credentials = ServiceCredentials {
            client_email: "contas@example.iam.example.com".to_owned(),
            private_key: "key material".to_owned(),
            workbook_key: "casa-teste".to_owned(),
        };
        let workbook = Workbook::open(&workbook_dir, &credentials).unwrap();

        TransactionsViewState {
            store: Arc::new(TransactionStore::new(workbook)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    async fn parse_html(response: Response<Body>) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    fn cell_texts(html: &Html, column: usize) -> Vec<String> {
        let selector = Selector::parse("tbody tr").unwrap();
        let cell_selector = Selector::parse("td").unwrap();

        html.select(&selector)
            .map(|row| {
                row.select(&cell_selector)
                    .nth(column)
                    .map(|cell| cell.text().collect::<String>().trim().to_owned())
                    .unwrap_or_default()
            })
            .collect()
    }

    #[tokio::test]
    async fn lists_actionable_rows_first() {
        let dir = TempDir::new().unwrap();
        let state = get_test_state(&dir);
        let today = OffsetDateTime::now_utc().date();

        state
            .store
            .create(
                Transaction::build(TransactionKind::Expense, 700.0, today, "Aluguel")
                    .category("Moradia")
                    .status(Status::Paid),
            )
            .unwrap();
        state
            .store
            .create(
                Transaction::build(TransactionKind::Expense, 300.0, today, "Luz")
                    .category("Contas")
                    .status(Status::Pending),
            )
            .unwrap();
        state
            .store
            .create(
                Transaction::build(TransactionKind::Income, 1000.0, today, "Salário")
                    .category("Salário"),
            )
            .unwrap();

        let response = get_transactions_page(
            State(state),
            Query(TransactionsQuery { period: None }),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;
        let descriptions = cell_texts(&html, 1);
        assert_eq!(descriptions, vec!["Salário", "Luz", "Aluguel"]);
    }

    #[tokio::test]
    async fn filters_to_the_selected_period() {
        let dir = TempDir::new().unwrap();
        let state = get_test_state(&dir);
        let today = OffsetDateTime::now_utc().date();
        let long_ago = today - Duration::days(400);

        state
            .store
            .create(Transaction::build(
                TransactionKind::Expense,
                10.0,
                today,
                "Recent",
            ))
            .unwrap();
        state
            .store
            .create(Transaction::build(
                TransactionKind::Expense,
                20.0,
                long_ago,
                "Old",
            ))
            .unwrap();

        // The default period is the current month.
        let response = get_transactions_page(
            State(state.clone()),
            Query(TransactionsQuery { period: None }),
        )
        .await
        .unwrap();
        let html = parse_html(response).await;
        let descriptions = cell_texts(&html, 1);
        assert_eq!(descriptions, vec!["Recent"]);

        // "all" disables filtering.
        let response = get_transactions_page(
            State(state),
            Query(TransactionsQuery {
                period: Some("all".to_owned()),
            }),
        )
        .await
        .unwrap();
        let html = parse_html(response).await;
        assert_eq!(cell_texts(&html, 1).len(), 2);
    }

    #[tokio::test]
    async fn rows_carry_edit_and_delete_actions() {
        let dir = TempDir::new().unwrap();
        let state = get_test_state(&dir);
        let today = OffsetDateTime::now_utc().date();
        let created = state
            .store
            .create(Transaction::build(
                TransactionKind::Expense,
                10.0,
                today,
                "Feira",
            ))
            .unwrap();

        let response = get_transactions_page(
            State(state),
            Query(TransactionsQuery { period: None }),
        )
        .await
        .unwrap();
        let html = parse_html(response).await;

        let edit_selector =
            Selector::parse(&format!("a[href='/transactions/{}/edit']", created.id)).unwrap();
        assert!(html.select(&edit_selector).next().is_some());

        let delete_selector =
            Selector::parse(&format!("button[hx-delete='/api/transactions/{}']", created.id))
                .unwrap();
        assert!(html.select(&delete_selector).next().is_some());
    }

    #[tokio::test]
    async fn shows_a_prompt_when_the_period_is_empty() {
        let dir = TempDir::new().unwrap();
        let state = get_test_state(&dir);

        let response = get_transactions_page(
            State(state),
            Query(TransactionsQuery { period: None }),
        )
        .await
        .unwrap();
        let html = parse_html(response).await;

        let table_selector = Selector::parse("table").unwrap();
        assert!(html.select(&table_selector).next().is_none());

        let link_selector = Selector::parse("a[href='/transactions/new']").unwrap();
        assert!(html.select(&link_selector).next().is_some());
    }
}
