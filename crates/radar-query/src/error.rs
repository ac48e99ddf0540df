//! Query error types.

use radar_store::StoreError;

/// Errors from the analytic query set.
///
/// The cache adds no variants of its own: it forwards whatever the wrapped
/// query returned.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// A parameter was rejected before any store round-trip.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The store failed to run the query.
    #[error("Query failed: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// Warehouse access failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
