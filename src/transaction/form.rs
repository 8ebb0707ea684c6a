//! The form fields shared by the new-transaction and edit pages.

use maud::{Markup, html};
use time::Date;

use crate::{
    category::CategoryOptions,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::model::{Status, TransactionKind},
};

/// The values the form fields start out with.
pub(crate) struct TransactionFormDefaults<'a> {
    pub kind: TransactionKind,
    pub amount: Option<f64>,
    pub date: Date,
    /// The latest date the date picker allows, i.e. today.
    pub max_date: Date,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
    pub status: Status,
    pub account: Option<&'a str>,
}

/// Render the shared form fields. The caller wraps them in a form element
/// that points at the create or edit endpoint.
pub(crate) fn transaction_form_fields(
    defaults: &TransactionFormDefaults<'_>,
    categories: &CategoryOptions,
) -> Markup {
    let is_expense = matches!(defaults.kind, TransactionKind::Expense);
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));
    let amount_placeholder = amount_str.as_deref().unwrap_or("0.01");
    let description_placeholder = defaults.description.unwrap_or("Description");

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                div class="flex items-center gap-3"
                {
                    input
                        name="kind"
                        id="transaction-kind-expense"
                        type="radio"
                        value="expense"
                        checked[is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-kind-expense"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Expense"
                    }
                }

                div class="flex items-center gap-3"
                {
                    input
                        name="kind"
                        id="transaction-kind-income"
                        type="radio"
                        value="income"
                        checked[!is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-kind-income"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Income"
                    }
                }
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    placeholder=(amount_placeholder)
                    min="0.01"
                    required
                    value=[amount_str.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                max=(defaults.max_date)
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder=(description_placeholder)
                value=[defaults.description]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category"
                id="category"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                (category_group("Income", &categories.income, defaults.category))
                (category_group("Fixed expenses", &categories.fixed_expense, defaults.category))
                (category_group("Variable expenses", &categories.variable_expense, defaults.category))
            }
        }

        div
        {
            label
                for="status"
                class=(FORM_LABEL_STYLE)
            {
                "Status"
            }

            select
                name="status"
                id="status"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                (status_option(Status::Paid, defaults.status))
                (status_option(Status::Pending, defaults.status))
                (status_option(Status::Cancelled, defaults.status))
            }
        }

        div
        {
            label
                for="account"
                class=(FORM_LABEL_STYLE)
            {
                "Account or payment method"
            }

            input
                name="account"
                id="account"
                type="text"
                placeholder="e.g. Nubank, Pix"
                value=[defaults.account]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn category_group(label: &str, names: &[String], selected: Option<&str>) -> Markup {
    html! {
        @if !names.is_empty() {
            optgroup label=(label)
            {
                @for name in names {
                    @if Some(name.as_str()) == selected {
                        option value=(name) selected { (name) }
                    } @else {
                        option value=(name) { (name) }
                    }
                }
            }
        }
    }
}

fn status_option(status: Status, selected: Status) -> Markup {
    // Values match the lowercase form encoding of `Status`.
    let value = status.as_str().to_lowercase();

    html! {
        @if status == selected {
            option value=(value) selected { (status.as_str()) }
        } @else {
            option value=(value) { (status.as_str()) }
        }
    }
}
