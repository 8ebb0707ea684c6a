//! The transaction store: durable persistence in the workbook plus a
//! bounded-lifetime read cache.
//!
//! The store is constructed once at process start and shared by handle.
//! A mutex serializes access to the workbook and the cache, so writers
//! within this process cannot race each other. Two *processes* sharing one
//! workbook still can: locating a row and overwriting it are separate file
//! operations, and nothing locks the workbook between them. The store is
//! single-writer by convention.

use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

use time::OffsetDateTime;

use crate::{
    Error,
    category::{self, Category},
    sheet::Workbook,
    transaction::model::{NewTransaction, Transaction, generate_transaction_id},
};

/// How long a read result stays fresh before the next load goes back to the
/// workbook.
pub(crate) const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

/// Reads and writes transactions against an open workbook.
#[derive(Debug)]
pub struct TransactionStore {
    inner: Mutex<StoreInner>,
    cache_ttl: Duration,
}

#[derive(Debug)]
struct StoreInner {
    workbook: Workbook,
    cache: Option<CachedRows>,
}

#[derive(Debug)]
struct CachedRows {
    rows: Vec<Transaction>,
    loaded_at: Instant,
}

impl TransactionStore {
    /// Create a store over an open workbook with the default cache
    /// lifetime.
    pub fn new(workbook: Workbook) -> Self {
        Self::with_cache_ttl(workbook, DEFAULT_CACHE_TTL)
    }

    /// Create a store with a custom cache lifetime.
    pub fn with_cache_ttl(workbook: Workbook, cache_ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                workbook,
                cache: None,
            }),
            cache_ttl,
        }
    }

    /// Load every transaction, reusing the cached result while it is
    /// fresh.
    ///
    /// Rows whose amount or date cannot be parsed are dropped, not
    /// surfaced. This fails closed: a backend read error is logged once and
    /// an empty collection returned, so callers render a no-data view
    /// instead of crashing. Calling `load` twice with no intervening writes
    /// returns identical data.
    pub fn load(&self) -> Vec<Transaction> {
        let mut inner = match self.inner.lock() {
            Ok(inner) => inner,
            Err(error) => {
                tracing::error!("could not acquire the store lock: {error}");
                return Vec::new();
            }
        };

        if let Some(cache) = &inner.cache
            && cache.loaded_at.elapsed() < self.cache_ttl
        {
            return cache.rows.clone();
        }

        let raw_rows = match inner.workbook.transactions().read_rows() {
            Ok(rows) => rows,
            Err(error) => {
                tracing::error!("could not read transactions: {error}");
                return Vec::new();
            }
        };

        let total = raw_rows.len();
        let rows: Vec<Transaction> = raw_rows
            .iter()
            .filter_map(|row| Transaction::from_row(row))
            .collect();

        if rows.len() < total {
            tracing::debug!("dropped {} malformed transaction rows", total - rows.len());
        }

        inner.cache = Some(CachedRows {
            rows: rows.clone(),
            loaded_at: Instant::now(),
        });

        rows
    }

    /// Validate `new`, assign it a fresh id, and append it to the
    /// workbook.
    ///
    /// The read cache is invalidated on success so the next load reflects
    /// the new row. Backend failures are surfaced, not retried.
    ///
    /// # Errors
    /// - [Error::EmptyDescription] or [Error::NonPositiveAmount] before
    ///   anything is written.
    /// - [Error::Sheet] if the append fails.
    pub fn create(&self, new: NewTransaction) -> Result<Transaction, Error> {
        new.validate()?;

        let mut inner = self.inner.lock().map_err(|_| Error::StoreLock)?;

        let id = generate_transaction_id(OffsetDateTime::now_utc().date());
        let transaction = new.into_transaction(id);

        inner.workbook.transactions().append_row(&transaction.to_row())?;
        inner.cache = None;

        Ok(transaction)
    }

    /// Overwrite the transaction with the given `id`.
    ///
    /// The whole row is rewritten from `fields`; partial updates are not
    /// supported. The id itself never changes.
    ///
    /// # Errors
    /// - [Error::TransactionNotFound] if no row has this id; nothing is
    ///   changed.
    /// - Validation and backend errors as for [TransactionStore::create].
    pub fn update(&self, id: &str, fields: NewTransaction) -> Result<Transaction, Error> {
        fields.validate()?;

        let mut inner = self.inner.lock().map_err(|_| Error::StoreLock)?;

        let index = locate_row(&inner.workbook, id)?;
        let transaction = fields.into_transaction(id.to_owned());

        inner
            .workbook
            .transactions()
            .overwrite_row(index, &transaction.to_row())?;
        inner.cache = None;

        Ok(transaction)
    }

    /// Remove the transaction with the given `id`.
    ///
    /// # Errors
    /// - [Error::TransactionNotFound] if no row has this id; nothing is
    ///   changed.
    /// - [Error::Sheet] if the delete fails.
    pub fn delete(&self, id: &str) -> Result<(), Error> {
        let mut inner = self.inner.lock().map_err(|_| Error::StoreLock)?;

        let index = locate_row(&inner.workbook, id)?;

        inner.workbook.transactions().delete_row(index)?;
        inner.cache = None;

        Ok(())
    }

    /// Read the category catalog.
    ///
    /// Falls back to the built-in catalog when the worksheet cannot be read
    /// or contains no usable rows, so the forms stay usable on a fresh or
    /// damaged workbook.
    pub fn categories(&self) -> Vec<Category> {
        let inner = match self.inner.lock() {
            Ok(inner) => inner,
            Err(error) => {
                tracing::error!("could not acquire the store lock: {error}");
                return category::default_catalog();
            }
        };

        let raw_rows = match inner.workbook.categories().read_rows() {
            Ok(rows) => rows,
            Err(error) => {
                tracing::error!("could not read categories: {error}");
                return category::default_catalog();
            }
        };

        let catalog: Vec<Category> = raw_rows
            .iter()
            .filter_map(|row| Category::from_row(row))
            .collect();

        if catalog.is_empty() {
            return category::default_catalog();
        }

        catalog
    }
}

/// Find the raw row position of the transaction with the given id.
///
/// Positions are raw worksheet positions, so rows that fail to parse still
/// count; overwrites and deletes would otherwise hit the wrong row.
fn locate_row(workbook: &Workbook, id: &str) -> Result<usize, Error> {
    let rows = workbook.transactions().read_rows()?;

    rows.iter()
        .position(|row| row.first().map(String::as_str) == Some(id))
        .ok_or(Error::TransactionNotFound)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::TempDir;
    use time::macros::date;

    use crate::{
        Error,
        sheet::{ServiceCredentials, Workbook},
        transaction::model::{NewTransaction, Status, Transaction, TransactionKind},
    };

    use super::TransactionStore;

    const WORKBOOK_KEY: &str = "casa-teste";

    fn open_workbook(dir: &TempDir) -> Workbook {
        let workbook_dir = dir.path().join(WORKBOOK_KEY);
        if !workbook_dir.exists() {
            std::fs::create_dir(&workbook_dir).unwrap();
        }

        let credentials = ServiceCredentials {
            client_email: "contas@example.iam.example.com".to_owned(),
            private_key: "key material".to_owned(),
            workbook_key: WORKBOOK_KEY.to_owned(),
        };

        Workbook::open(&workbook_dir, &credentials).expect("could not open test workbook")
    }

    fn get_test_store(dir: &TempDir) -> TransactionStore {
        TransactionStore::new(open_workbook(dir))
    }

    fn new_expense(description: &str, amount: f64) -> NewTransaction {
        Transaction::build(
            TransactionKind::Expense,
            amount,
            date!(2026 - 03 - 10),
            description,
        )
        .category("Mercado")
        .status(Status::Pending)
    }

    #[test]
    fn create_then_load_returns_the_new_row() {
        let dir = TempDir::new().unwrap();
        let store = get_test_store(&dir);
        store.create(new_expense("Feira", 245.9)).unwrap();

        let created = store
            .create(new_expense("Padaria", 32.5).account(Some("Pix".to_owned())))
            .unwrap();

        let rows = store.load();
        assert_eq!(rows.len(), 2);

        let row = rows.iter().find(|row| row.id == created.id).unwrap();
        assert_eq!(row.description, "Padaria");
        assert_eq!(row.amount, 32.5);
        assert_eq!(row.category, "Mercado");
        assert_eq!(row.status, Status::Pending);
        assert_eq!(row.account.as_deref(), Some("Pix"));

        // Each row keeps its own id.
        assert_ne!(rows[0].id, rows[1].id);
    }

    #[test]
    fn create_rejects_invalid_input_without_writing() {
        let dir = TempDir::new().unwrap();
        let store = get_test_store(&dir);

        let result = store.create(new_expense("", 50.0));
        assert_eq!(result, Err(Error::EmptyDescription));

        let result = store.create(new_expense("Feira", 0.0));
        assert_eq!(result, Err(Error::NonPositiveAmount));

        assert_eq!(store.load().len(), 0);
    }

    #[test]
    fn update_overwrites_the_full_row_without_duplicating_it() {
        let dir = TempDir::new().unwrap();
        let store = get_test_store(&dir);
        let created = store.create(new_expense("Feira", 245.9)).unwrap();

        let fields = Transaction::build(
            TransactionKind::Expense,
            199.9,
            date!(2026 - 03 - 12),
            "Feira (corrigida)",
        )
        .category("Mercado")
        .status(Status::Paid);
        store.update(&created.id, fields).unwrap();

        let rows = store.load();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, created.id);
        assert_eq!(rows[0].description, "Feira (corrigida)");
        assert_eq!(rows[0].amount, 199.9);
        assert_eq!(rows[0].date, date!(2026 - 03 - 12));
        assert_eq!(rows[0].status, Status::Paid);
    }

    #[test]
    fn update_missing_id_reports_not_found_and_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = get_test_store(&dir);
        store.create(new_expense("Feira", 245.9)).unwrap();

        let result = store.update("TRX-20260101-0000", new_expense("Outra", 10.0));

        assert_eq!(result, Err(Error::TransactionNotFound));
        let rows = store.load();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Feira");
    }

    #[test]
    fn delete_removes_exactly_one_row() {
        let dir = TempDir::new().unwrap();
        let store = get_test_store(&dir);
        let first = store.create(new_expense("Feira", 245.9)).unwrap();
        store.create(new_expense("Padaria", 32.5)).unwrap();

        store.delete(&first.id).unwrap();

        let rows = store.load();
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|row| row.id != first.id));
    }

    #[test]
    fn delete_missing_id_reports_not_found_and_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = get_test_store(&dir);
        store.create(new_expense("Feira", 245.9)).unwrap();

        let result = store.delete("TRX-20260101-0000");

        assert_eq!(result, Err(Error::TransactionNotFound));
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn load_twice_returns_identical_data() {
        let dir = TempDir::new().unwrap();
        let store = get_test_store(&dir);
        store.create(new_expense("Feira", 245.9)).unwrap();
        store.create(new_expense("Padaria", 32.5)).unwrap();

        assert_eq!(store.load(), store.load());
    }

    #[test]
    fn load_serves_from_cache_until_a_write_invalidates_it() {
        let dir = TempDir::new().unwrap();
        let store = get_test_store(&dir);
        store.create(new_expense("Feira", 245.9)).unwrap();
        assert_eq!(store.load().len(), 1);

        // A second handle on the same workbook bypasses this store's cache.
        let other_store = get_test_store(&dir);
        other_store.create(new_expense("Padaria", 32.5)).unwrap();

        // Still the cached result.
        assert_eq!(store.load().len(), 1);

        // The store's own write invalidates the cache.
        store.create(new_expense("Farmácia", 58.0)).unwrap();
        assert_eq!(store.load().len(), 3);
    }

    #[test]
    fn expired_cache_rereads_the_workbook() {
        let dir = TempDir::new().unwrap();
        let store = TransactionStore::with_cache_ttl(open_workbook(&dir), Duration::ZERO);
        store.create(new_expense("Feira", 245.9)).unwrap();
        assert_eq!(store.load().len(), 1);

        let other_store = get_test_store(&dir);
        other_store.create(new_expense("Padaria", 32.5)).unwrap();

        assert_eq!(store.load().len(), 2);
    }

    #[test]
    fn malformed_rows_are_excluded_from_load() {
        let dir = TempDir::new().unwrap();
        let workbook_dir = dir.path().join(WORKBOOK_KEY);
        std::fs::create_dir(&workbook_dir).unwrap();
        std::fs::write(
            workbook_dir.join("TRANSACTIONS.csv"),
            "id,date,description,kind,category,amount,status,account\n\
            TRX-20260310-ab12,2026-03-10,Feira,Expense,Mercado,245.90,Paid,\n\
            TRX-20260310-cd34,2026-03-10,Sem valor,Expense,Mercado,quinhentos,Paid,\n\
            TRX-20260310-ef56,10/03/2026,Data ruim,Expense,Mercado,10.00,Paid,\n",
        )
        .unwrap();
        let store = get_test_store(&dir);

        let rows = store.load();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "TRX-20260310-ab12");
    }

    #[test]
    fn load_fails_closed_when_the_backend_read_fails() {
        let dir = TempDir::new().unwrap();
        let store = get_test_store(&dir);
        store.create(new_expense("Feira", 245.9)).unwrap();

        std::fs::remove_file(dir.path().join(WORKBOOK_KEY).join("TRANSACTIONS.csv")).unwrap();

        assert_eq!(store.load(), Vec::new());
    }

    #[test]
    fn malformed_row_positions_do_not_shift_updates() {
        let dir = TempDir::new().unwrap();
        let workbook_dir = dir.path().join(WORKBOOK_KEY);
        std::fs::create_dir(&workbook_dir).unwrap();
        // The malformed row sits above the target row; the update must not
        // disturb it.
        std::fs::write(
            workbook_dir.join("TRANSACTIONS.csv"),
            "id,date,description,kind,category,amount,status,account\n\
            TRX-20260310-cd34,2026-03-10,Sem valor,Expense,Mercado,quinhentos,Paid,\n\
            TRX-20260310-ab12,2026-03-10,Feira,Expense,Mercado,245.90,Paid,\n",
        )
        .unwrap();
        let store = get_test_store(&dir);

        store
            .update("TRX-20260310-ab12", new_expense("Feira (corrigida)", 199.9))
            .unwrap();

        let rows = store.load();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Feira (corrigida)");

        let raw = std::fs::read_to_string(workbook_dir.join("TRANSACTIONS.csv")).unwrap();
        assert!(raw.contains("Sem valor"));
    }

    #[test]
    fn categories_fall_back_to_the_default_catalog() {
        let dir = TempDir::new().unwrap();
        let store = get_test_store(&dir);

        // Fresh workbook: the catalog sheet exists but is empty.
        let catalog = store.categories();
        assert!(!catalog.is_empty());

        // A populated sheet takes precedence.
        std::fs::write(
            dir.path().join(WORKBOOK_KEY).join("CATEGORIES.csv"),
            "kind,name\nIncome,Salário\nExpense,Mercado\nTransfer,Ignorada\n",
        )
        .unwrap();
        let catalog = store.categories();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].name, "Salário");
    }
}
