//! The transaction record, its worksheet encoding, and id generation.

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use uuid::Uuid;

use crate::Error;

/// Column order of the transaction worksheet.
///
/// This order is the wire contract: every append and overwrite serializes
/// fields in exactly this order, and [Transaction::from_row] reads them
/// back by position.
pub(crate) const TRANSACTION_COLUMNS: [&str; 8] = [
    "id",
    "date",
    "description",
    "kind",
    "category",
    "amount",
    "status",
    "account",
];

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Number of random characters appended to a generated transaction id.
const ID_SUFFIX_LENGTH: usize = 4;

/// Whether a transaction records money coming in or going out.
///
/// Filtering and signed totals depend on exact matches of the worksheet
/// cell, so the wire form is the capitalized name and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// The worksheet cell value for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }

    /// Parse a worksheet cell. Exact match only.
    pub(crate) fn parse(cell: &str) -> Option<Self> {
        match cell {
            "Income" => Some(TransactionKind::Income),
            "Expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the money for a transaction has actually moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The amount has been paid or received.
    Paid,
    /// Recorded but not yet settled.
    Pending,
    /// Called off; kept for the record.
    Cancelled,
}

impl Status {
    /// The worksheet cell value for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Paid => "Paid",
            Status::Pending => "Pending",
            Status::Cancelled => "Cancelled",
        }
    }

    /// Parse a worksheet cell. Exact match only.
    pub(crate) fn parse(cell: &str) -> Option<Self> {
        match cell {
            "Paid" => Some(Status::Paid),
            "Pending" => Some(Status::Pending),
            "Cancelled" => Some(Status::Cancelled),
            _ => None,
        }
    }

    /// Whether this status counts toward realized totals.
    pub fn is_realized(self) -> bool {
        matches!(self, Status::Paid)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One income or expense record.
///
/// To create a new `Transaction`, use [Transaction::build] and pass the
/// result to [crate::TransactionStore::create], which assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque unique identifier, assigned at creation and never changed.
    /// The sole lookup key for updates and deletes.
    pub id: String,
    /// When the money moved or is due to move.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// Income or expense.
    pub kind: TransactionKind,
    /// The category label, e.g. "Moradia", "Mercado".
    pub category: String,
    /// The amount in reais. Always positive; the kind carries the sign.
    pub amount: f64,
    /// Whether the money has actually moved.
    pub status: Status,
    /// The account or payment method, e.g. "Nubank", "Pix".
    pub account: Option<String>,
}

impl Transaction {
    /// Start describing a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(
        kind: TransactionKind,
        amount: f64,
        date: Date,
        description: &str,
    ) -> NewTransaction {
        NewTransaction {
            kind,
            amount,
            date,
            description: description.to_owned(),
            category: String::new(),
            status: Status::Paid,
            account: None,
        }
    }

    /// Serialize this transaction as worksheet cells in the order of
    /// [TRANSACTION_COLUMNS].
    pub(crate) fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.date.to_string(),
            self.description.clone(),
            self.kind.to_string(),
            self.category.clone(),
            format!("{:.2}", self.amount),
            self.status.to_string(),
            self.account.clone().unwrap_or_default(),
        ]
    }

    /// Parse worksheet cells back into a transaction.
    ///
    /// Returns `None` for rows that cannot be typed: a missing id, an
    /// unparsable date or amount, or an unknown kind. Such rows are
    /// excluded from reads rather than surfaced per row. A missing or
    /// empty status cell (older workbooks predate the column) defaults to
    /// [Status::Paid].
    pub(crate) fn from_row(row: &[String]) -> Option<Self> {
        let id = row.first()?.trim();
        if id.is_empty() {
            return None;
        }

        let date = Date::parse(row.get(1)?.trim(), DATE_FORMAT).ok()?;
        let description = row.get(2)?.clone();
        let kind = TransactionKind::parse(row.get(3)?.trim())?;
        let category = row.get(4)?.clone();
        let amount: f64 = row.get(5)?.trim().parse().ok().filter(|n: &f64| n.is_finite())?;

        let status = match row.get(6).map(|cell| cell.trim()) {
            None | Some("") => Status::Paid,
            Some(cell) => Status::parse(cell)?,
        };

        let account = row
            .get(7)
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
            .map(str::to_owned);

        Some(Self {
            id: id.to_owned(),
            date,
            description,
            kind,
            category,
            amount,
            status,
            account,
        })
    }
}

/// A transaction still missing its id.
///
/// Built with [Transaction::build], refined with the chained setters, and
/// finalized by the store, which validates it and assigns a fresh id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Income or expense.
    pub kind: TransactionKind,
    /// The amount in reais. Must be greater than zero.
    pub amount: f64,
    /// When the money moved or is due to move.
    pub date: Date,
    /// A text description of what the transaction was for. Must not be
    /// empty.
    pub description: String,
    /// The category label.
    pub category: String,
    /// Whether the money has actually moved. Defaults to [Status::Paid],
    /// matching how income is recorded.
    pub status: Status,
    /// The account or payment method.
    pub account: Option<String>,
}

impl NewTransaction {
    /// Set the category label.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set the status.
    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Set the account or payment method.
    pub fn account(mut self, account: Option<String>) -> Self {
        self.account = account;
        self
    }

    /// Check the fields that must hold before anything is written.
    ///
    /// # Errors
    /// - [Error::EmptyDescription] if the description is empty or blank.
    /// - [Error::NonPositiveAmount] if the amount is zero, negative, or not
    ///   a number.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.description.trim().is_empty() {
            return Err(Error::EmptyDescription);
        }

        if !(self.amount > 0.0) || !self.amount.is_finite() {
            return Err(Error::NonPositiveAmount);
        }

        Ok(())
    }

    /// Finalize into a [Transaction] with the given id.
    pub(crate) fn into_transaction(self, id: String) -> Transaction {
        Transaction {
            id,
            date: self.date,
            description: self.description,
            kind: self.kind,
            category: self.category,
            amount: self.amount,
            status: self.status,
            account: self.account,
        }
    }
}

/// Generate a fresh transaction id: "TRX-", a compact date stamp, and a
/// short random suffix.
///
/// Uniqueness holds with overwhelming probability but is not checked
/// against existing rows.
pub(crate) fn generate_transaction_id(today: Date) -> String {
    let stamp = format!(
        "{:04}{:02}{:02}",
        today.year(),
        u8::from(today.month()),
        today.day()
    );
    let random = Uuid::new_v4().simple().to_string();

    format!("TRX-{stamp}-{}", &random[..ID_SUFFIX_LENGTH])
}
