//! # radar-store
//!
//! `DuckDB` warehouse handle for Upset Radar.
//!
//! One [`Warehouse`] is opened at startup and passed by reference to the loader
//! and the query layer. The `raw` tables and the `mart` views already exist in
//! the database; this crate never creates or alters schema outside of tests.
//!
//! `duckdb::Connection` is `Send` but not `Sync`, so the handle serializes access
//! behind a mutex. Queries are short read-only aggregates and loads are
//! sequential, so a single connection is enough.

pub mod error;
pub mod table_ref;

pub use error::StoreError;
pub use table_ref::TableRef;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use duckdb::{Connection, params};

/// Shared handle to the analytics database.
pub struct Warehouse {
    conn: Mutex<Connection>,
}

impl Warehouse {
    /// Open a database file, or an in-memory database for `":memory:"`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuckDb`] if the file cannot be opened.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        if path == ":memory:" {
            return Self::open_in_memory();
        }
        tracing::debug!(path, "opening warehouse");
        let conn = Connection::open(Path::new(path))?;
        Ok(Self::from_connection(conn))
    }

    /// Open an empty in-memory database (for tests).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuckDb`] if `DuckDB` fails to start.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::from_connection(conn))
    }

    #[must_use]
    pub const fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Run `f` with exclusive access to the connection.
    ///
    /// The closure gets `&mut Connection` so it can open a transaction.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns, or [`StoreError::Poisoned`] (converted
    /// into `E`) if the lock is poisoned.
    pub fn with_conn<T, E>(&self, f: impl FnOnce(&mut Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut guard = self.lock()?;
        f(&mut *guard)
    }

    /// Column names of `table` in ordinal order. Empty if the table does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuckDb`] if the catalog query fails.
    pub fn table_columns(&self, table: &TableRef) -> Result<Vec<String>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT column_name FROM information_schema.columns
                 WHERE table_schema = ? AND table_name = ?
                 ORDER BY ordinal_position",
            )?;
            let columns = stmt
                .query_map(params![table.schema, table.table], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(columns)
        })
    }

    /// Number of rows currently in `table`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuckDb`] if the table does not exist.
    pub fn row_count(&self, table: &TableRef) -> Result<i64, StoreError> {
        self.with_conn(|conn| {
            let sql = format!("SELECT count(*) FROM {}", table.quoted());
            Ok(conn.query_row(&sql, [], |row| row.get(0))?)
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}
