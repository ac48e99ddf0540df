//! Ingestion error types.

use std::path::PathBuf;

use radar_store::{StoreError, TableRef};

/// Errors that abort a table load (and with it the whole manifest run).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The source file does not exist or is not a regular file.
    #[error("Missing source {}: place the export in the raw data directory", path.display())]
    MissingSource { path: PathBuf },

    /// The destination table does not exist in the warehouse.
    #[error("Destination table {table} does not exist")]
    MissingDestination { table: TableRef },

    /// The normalized header does not fit the destination's columns.
    #[error("Schema mismatch loading {table}: {reason}")]
    SchemaMismatch { table: TableRef, reason: String },

    /// The source could not be parsed as delimited data with a header row.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The store aborted the replace transaction; the table keeps its old rows.
    #[error("Transaction failed for {table}: {source}")]
    Transaction {
        table: TableRef,
        #[source]
        source: duckdb::Error,
    },

    /// Warehouse access failed outside the transaction.
    #[error(transparent)]
    Store(#[from] StoreError),
}
