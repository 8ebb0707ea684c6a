//! The workbook backend: credentials, connection establishment, and the
//! CSV worksheet client.
//!
//! A workbook is a directory named by a fixed key that holds one CSV file
//! per worksheet. Each worksheet has a fixed header row, and the column
//! order is the wire contract for every append and overwrite: a mismatch
//! silently shifts fields, which is why only the typed layer in
//! [crate::transaction] is allowed to build rows.

mod credentials;
mod workbook;
mod worksheet;

pub use credentials::ServiceCredentials;
pub use workbook::{RetryPolicy, Workbook, connect_with_policy};
pub use worksheet::Worksheet;
