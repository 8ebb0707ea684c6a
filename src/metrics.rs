//! Derived figures over the in-memory transaction set.
//!
//! Provides the reporting period type, period filtering, the KPI totals,
//! expense grouping for the dashboard chart, and the ordering that puts
//! actionable rows first in the transaction listing.

use time::Date;

use crate::transaction::{Status, Transaction, TransactionKind};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The calendar bucket a transaction is filed under for reporting: a month
/// of a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    /// The calendar year.
    pub year: i32,
    /// The month, 1 through 12.
    pub month: u8,
}

impl Period {
    /// The period a date falls into.
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }

    /// Parse a `YYYY-MM` value, e.g. "2026-08".
    pub fn parse(text: &str) -> Option<Self> {
        let (year, month) = text.split_once('-')?;
        let year: i32 = year.parse().ok()?;
        let month: u8 = month.parse().ok()?;

        if !(1..=12).contains(&month) {
            return None;
        }

        Some(Self { year, month })
    }

    /// A human-readable label, e.g. "Aug 2026".
    pub fn label(&self) -> String {
        let month = MONTH_ABBREVIATIONS[(self.month - 1) as usize];

        format!("{month} {}", self.year)
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Keep only the transactions filed under `period`.
///
/// Exact bucket equality; there are no range or fuzzy matches.
pub fn filter_by_period(transactions: &[Transaction], period: Period) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| Period::of(transaction.date) == period)
        .cloned()
        .collect()
}

/// The distinct periods present in `transactions`, most recent first.
///
/// Drives the period select on the dashboard and listing pages.
pub(crate) fn periods_of(transactions: &[Transaction]) -> Vec<Period> {
    let mut periods: Vec<Period> = transactions
        .iter()
        .map(|transaction| Period::of(transaction.date))
        .collect();
    periods.sort();
    periods.dedup();
    periods.reverse();

    periods
}

/// Resolve a `period` query parameter against today's date.
///
/// Absent or unparsable values select the current month; the literal "all"
/// disables filtering.
pub(crate) fn selected_period(param: Option<&str>, today: Date) -> Option<Period> {
    match param {
        Some("all") => None,
        Some(text) => Some(Period::parse(text).unwrap_or_else(|| Period::of(today))),
        None => Some(Period::of(today)),
    }
}

/// The aggregate figures shown as dashboard KPIs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    /// Sum of all income amounts regardless of status.
    pub gross_income: f64,
    /// Sum of all expense amounts regardless of status.
    pub gross_expense: f64,
    /// Sum of income amounts whose status is paid.
    pub realized_income: f64,
    /// Sum of expense amounts whose status is paid.
    pub realized_expense: f64,
    /// `realized_income - realized_expense`.
    pub net_realized: f64,
    /// `gross_expense - realized_expense`.
    pub pending_expense: f64,
}

/// Compute the KPI totals over a transaction set.
pub fn compute_totals(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => {
                totals.gross_income += transaction.amount;
                if transaction.status.is_realized() {
                    totals.realized_income += transaction.amount;
                }
            }
            TransactionKind::Expense => {
                totals.gross_expense += transaction.amount;
                if transaction.status.is_realized() {
                    totals.realized_expense += transaction.amount;
                }
            }
        }
    }

    totals.net_realized = totals.realized_income - totals.realized_expense;
    totals.pending_expense = totals.gross_expense - totals.realized_expense;

    totals
}

/// Sum expense amounts per category label, sorted descending by amount.
///
/// Ties keep the order the categories first appeared in, so the chart is
/// stable across reloads. Income rows are ignored.
pub fn group_expenses_by_category(transactions: &[Transaction]) -> Vec<(String, f64)> {
    let mut groups: Vec<(String, f64)> = Vec::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionKind::Expense)
    {
        match groups
            .iter_mut()
            .find(|(category, _)| *category == transaction.category)
        {
            Some((_, total)) => *total += transaction.amount,
            None => groups.push((transaction.category.clone(), transaction.amount)),
        }
    }

    // Vec::sort_by is stable, so equal totals keep first-appearance order.
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));

    groups
}

/// Order transactions so the rows most likely to need action come first:
/// income before expenses, pending expenses before paid ones, larger
/// amounts first within a group.
pub fn sort_for_action(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        kind_rank(a.kind)
            .cmp(&kind_rank(b.kind))
            .then_with(|| status_rank(a).cmp(&status_rank(b)))
            .then_with(|| b.amount.total_cmp(&a.amount))
    });
}

fn kind_rank(kind: TransactionKind) -> u8 {
    match kind {
        TransactionKind::Income => 0,
        TransactionKind::Expense => 1,
    }
}

/// Status only separates expenses; income rows stay ordered by amount.
fn status_rank(transaction: &Transaction) -> u8 {
    if transaction.kind == TransactionKind::Income {
        return 0;
    }

    match transaction.status {
        Status::Pending => 0,
        Status::Paid => 1,
        Status::Cancelled => 2,
    }
}
