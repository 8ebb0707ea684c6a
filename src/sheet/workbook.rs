//! Opening a workbook and the connection retry policy.

use std::{path::Path, thread, time::Duration};

use crate::{
    Error, category::CATEGORY_COLUMNS, sheet::credentials::ServiceCredentials,
    sheet::worksheet::Worksheet, transaction::TRANSACTION_COLUMNS,
};

/// The worksheet holding transaction rows.
const TRANSACTIONS_SHEET: &str = "TRANSACTIONS.csv";
/// The worksheet holding the category catalog.
const CATEGORIES_SHEET: &str = "CATEGORIES.csv";

/// An open workbook: the tabular document acting as the system of record.
///
/// A workbook is a directory named by its key. Opening it checks that the
/// supplied credential is scoped to that key and ensures both worksheets
/// exist.
#[derive(Debug)]
pub struct Workbook {
    key: String,
    transactions: Worksheet,
    categories: Worksheet,
}

impl Workbook {
    /// Open the workbook at `dir` with `credentials`.
    ///
    /// The workbook key is the directory name and must equal the
    /// credential's `workbook_key`.
    ///
    /// # Errors
    /// - [Error::Authentication] if the credential is scoped to a different
    ///   workbook.
    /// - [Error::Connection] if the directory does not exist or the
    ///   worksheet files cannot be opened.
    pub fn open(dir: &Path, credentials: &ServiceCredentials) -> Result<Self, Error> {
        let key = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if key != credentials.workbook_key {
            return Err(Error::Authentication(format!(
                "credential for {} is not scoped to workbook \"{key}\"",
                credentials.client_email
            )));
        }

        if !dir.is_dir() {
            return Err(Error::Connection(format!(
                "workbook \"{key}\" not found at {}",
                dir.display()
            )));
        }

        let transactions = Worksheet::open(dir.join(TRANSACTIONS_SHEET), &TRANSACTION_COLUMNS)?;
        let categories = Worksheet::open(dir.join(CATEGORIES_SHEET), &CATEGORY_COLUMNS)?;

        Ok(Self {
            key,
            transactions,
            categories,
        })
    }

    /// The key identifying this workbook.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The transactions worksheet.
    pub fn transactions(&self) -> &Worksheet {
        &self.transactions
    }

    /// The category catalog worksheet.
    pub fn categories(&self) -> &Worksheet {
        &self.categories
    }
}

/// How often and how patiently to retry connection establishment.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delays slept between attempts. Attempt `n` waits on entry `n - 1`;
    /// attempts past the end of the schedule reuse the last entry.
    pub backoff: Vec<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
            ],
        }
    }
}

impl RetryPolicy {
    /// The delay to sleep after the failed attempt numbered `attempt`
    /// (1-based).
    fn delay_after(&self, attempt: u32) -> Duration {
        let index = (attempt as usize).saturating_sub(1);

        self.backoff
            .get(index)
            .or_else(|| self.backoff.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}

/// Open the workbook at `dir`, retrying transient failures per `policy`.
///
/// Authentication failures are returned immediately, they never resolve by
/// waiting. Connection failures are retried until the policy's attempts are
/// exhausted, sleeping the scheduled delay between attempts; this blocks the
/// calling thread and is intended to run once at process start, before the
/// server begins rendering data-dependent pages.
///
/// # Errors
/// The error from the last attempt, or [Error::Authentication] from the
/// attempt that detected it.
pub fn connect_with_policy(
    dir: &Path,
    credentials: &ServiceCredentials,
    policy: &RetryPolicy,
) -> Result<Workbook, Error> {
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        match Workbook::open(dir, credentials) {
            Ok(workbook) => {
                tracing::info!(
                    "connected to workbook \"{}\" on attempt {attempt}",
                    workbook.key()
                );
                return Ok(workbook);
            }
            Err(error @ Error::Authentication(_)) => return Err(error),
            Err(error) => {
                if attempt == max_attempts {
                    return Err(error);
                }

                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    "connection attempt {attempt}/{max_attempts} failed ({error}), \
                    retrying in {delay:?}"
                );
                thread::sleep(delay);
            }
        }
    }

    unreachable!("the loop always returns on the final attempt")
}
