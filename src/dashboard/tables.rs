//! Table views for dashboard data display.

use maud::{Markup, html};

use crate::{
    html::{TABLE_CELL_STYLE, TABLE_ROW_STYLE, format_currency},
    metrics::Totals,
};

const TABLE_LABEL_CELL_STYLE: &str =
    "px-6 py-4 font-medium text-gray-900 dark:text-white text-left";
const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for positive, red for
/// negative).
fn amount_color_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        TABLE_CELL_GREEN_STYLE
    } else {
        TABLE_CELL_RED_STYLE
    }
}

/// Renders the KPI summary table for the selected period.
pub(super) fn totals_table(totals: &Totals) -> Markup {
    let rows = [
        ("Gross income", totals.gross_income, TABLE_CELL_GREEN_STYLE),
        ("Gross expenses", -totals.gross_expense, TABLE_CELL_RED_STYLE),
        (
            "Realized income",
            totals.realized_income,
            TABLE_CELL_GREEN_STYLE,
        ),
        (
            "Realized expenses",
            -totals.realized_expense,
            TABLE_CELL_RED_STYLE,
        ),
        (
            "Pending expenses",
            -totals.pending_expense,
            TABLE_CELL_RED_STYLE,
        ),
    ];

    html! {
        div {
            h3 class="text-xl font-semibold mb-4" { "Summary" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    tbody {
                        @for (label, amount, style) in rows {
                            tr class=(TABLE_ROW_STYLE) {
                                th scope="row" class=(TABLE_LABEL_CELL_STYLE) { (label) }
                                td class={(TABLE_CELL_STYLE) " whitespace-nowrap " (style)} {
                                    (format_currency(amount))
                                }
                            }
                        }

                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class={(TABLE_LABEL_CELL_STYLE) " font-bold"} {
                                "Net realized"
                            }
                            td class={
                                (TABLE_CELL_STYLE) " whitespace-nowrap font-bold "
                                (amount_color_class(totals.net_realized))
                            } {
                                (format_currency(totals.net_realized))
                            }
                        }
                    }
                }
            }
        }
    }
}
