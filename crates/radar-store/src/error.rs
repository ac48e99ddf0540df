//! Store error types.

/// Errors raised by the warehouse handle.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// `DuckDB` operation failed.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// A previous holder of the connection lock panicked.
    #[error("Warehouse connection lock poisoned: {0}")]
    Poisoned(String),
}
