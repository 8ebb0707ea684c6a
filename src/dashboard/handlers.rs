//! Dashboard HTTP handlers and view rendering.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    dashboard::{
        charts::{DashboardChart, charts_script, expenses_chart},
        tables::totals_table,
    },
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, link, period_picker},
    metrics::{
        compute_totals, filter_by_period, group_expenses_by_category, periods_of, selected_period,
    },
    navigation::NavBar,
    timezone::get_local_offset,
    transaction::TransactionStore,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The store for managing transactions.
    pub store: Arc<TransactionStore>,
    /// The local timezone as a canonical timezone name, e.g.
    /// "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters of the dashboard page.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// The selected period as `YYYY-MM`, or "all".
    period: Option<String>,
}

/// Display a page with the selected period's KPIs and expense breakdown.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let local_timezone = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezone(state.local_timezone.clone())
    })?;

    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    let all_transactions = state.store.load();
    let periods = periods_of(&all_transactions);
    let period = selected_period(query.period.as_deref(), today);

    let transactions = match period {
        Some(period) => filter_by_period(&all_transactions, period),
        None => all_transactions,
    };

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);
    let picker = period_picker(endpoints::DASHBOARD_VIEW, &periods, period);

    if transactions.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar, picker).into_response());
    }

    let totals = compute_totals(&transactions);
    let expense_groups = group_expenses_by_category(&transactions);

    let subtitle = match period {
        Some(period) => period.label(),
        None => "All periods".to_owned(),
    };
    let chart = DashboardChart {
        id: "expenses-chart",
        options: expenses_chart(&expense_groups, &subtitle).to_string(),
    };

    Ok(dashboard_view(nav_bar, picker, &totals_table(&totals), &chart).into_response())
}

/// Renders the dashboard page when the selected period has no transaction
/// data. Displays a helpful message with a link to add transactions.
fn dashboard_no_data_view(nav_bar: NavBar<'_>, picker: Markup) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "here");

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl" { (picker) }

            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "KPIs and charts will show up here once this period has some
                transactions. You can record one " (new_transaction_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with the KPI table and expenses chart.
fn dashboard_view(
    nav_bar: NavBar<'_>,
    picker: Markup,
    totals: &Markup,
    chart: &DashboardChart,
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            div class="w-full" { (picker) }

            section
                id="summary"
                class="w-full mx-auto mb-4"
            {
                div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                {
                    (totals)

                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(std::slice::from_ref(chart)),
    ];

    base("Dashboard", &scripts, &content)
}
