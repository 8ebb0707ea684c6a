//! Transaction management.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` record, its worksheet encoding, and id generation
//! - The store that persists transactions in the workbook
//! - View handlers and endpoints for the transaction pages

mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod model;
mod new_transaction_page;
mod store;
mod transactions_page;

pub use model::{NewTransaction, Status, Transaction, TransactionKind};
pub use store::TransactionStore;

pub(crate) use create_endpoint::create_transaction_endpoint;
pub(crate) use delete_endpoint::delete_transaction_endpoint;
pub(crate) use edit_endpoint::edit_transaction_endpoint;
pub(crate) use edit_page::get_edit_transaction_page;
pub(crate) use model::TRANSACTION_COLUMNS;
pub(crate) use new_transaction_page::get_new_transaction_page;
pub(crate) use transactions_page::get_transactions_page;
