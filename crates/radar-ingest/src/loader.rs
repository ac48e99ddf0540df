//! Transactional whole-table reloads.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use duckdb::appender_params_from_iter;
use radar_store::{TableRef, Warehouse};
use serde::Serialize;

use crate::LoadError;
use crate::batch::RawBatch;

/// Outcome of one successful table replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub source: PathBuf,
    pub table: TableRef,
    pub rows: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Replaces one destination table with the contents of one source file.
///
/// The orchestrator is generic over this so tests can count and fail calls.
pub trait TableLoader {
    /// # Errors
    ///
    /// Any [`LoadError`]; all of them are fatal to the current run.
    fn load(&self, source: &Path, table: &TableRef) -> Result<LoadReport, LoadError>;
}

/// [`TableLoader`] backed by the warehouse.
///
/// Reads the file fully, normalizes the header, then deletes and appends
/// every row inside one transaction. A failure at any point before commit
/// drops the transaction, which rolls back to the previous contents.
pub struct BulkLoader<'a> {
    warehouse: &'a Warehouse,
}

impl<'a> BulkLoader<'a> {
    #[must_use]
    pub const fn new(warehouse: &'a Warehouse) -> Self {
        Self { warehouse }
    }

    /// Check the normalized header against the destination's columns and
    /// return those columns in table order.
    fn check_columns(
        &self,
        table: &TableRef,
        columns: &[String],
    ) -> Result<Vec<String>, LoadError> {
        let existing = self.warehouse.table_columns(table)?;
        if existing.is_empty() {
            return Err(LoadError::MissingDestination {
                table: table.clone(),
            });
        }

        if columns.is_empty() {
            return Err(LoadError::SchemaMismatch {
                table: table.clone(),
                reason: "source has an empty header row".to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(columns.len());
        if let Some(duplicate) = columns.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(LoadError::SchemaMismatch {
                table: table.clone(),
                reason: format!("header normalizes to duplicate column '{duplicate}'"),
            });
        }

        let unknown: Vec<&str> = columns
            .iter()
            .filter(|c| !existing.contains(c))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(LoadError::SchemaMismatch {
                table: table.clone(),
                reason: format!(
                    "columns not in destination: {} (destination has: {})",
                    unknown.join(", "),
                    existing.join(", ")
                ),
            });
        }
        Ok(existing)
    }

    /// Delete every row, then append the batch through a `DuckDB` appender
    /// on the same transaction.
    ///
    /// The appender writes whole rows in table order, so each source row is
    /// laid out against `destination` with NULL for columns the file lacks.
    fn replace_rows(
        &self,
        table: &TableRef,
        destination: &[String],
        batch: &RawBatch,
    ) -> Result<(), LoadError> {
        let layout: Vec<Option<usize>> = destination
            .iter()
            .map(|column| batch.columns.iter().position(|c| c == column))
            .collect();
        let delete_sql = format!("DELETE FROM {}", table.quoted());

        let tx_err = |source| LoadError::Transaction {
            table: table.clone(),
            source,
        };

        self.warehouse.with_conn(|conn| {
            let tx = conn.transaction().map_err(tx_err)?;
            tx.execute(&delete_sql, []).map_err(tx_err)?;
            {
                let mut appender = tx
                    .appender_to_db(&table.table, &table.schema)
                    .map_err(tx_err)?;
                for row in &batch.rows {
                    let values = layout
                        .iter()
                        .map(|slot| slot.and_then(|index| row.get(index)?.as_deref()));
                    appender
                        .append_row(appender_params_from_iter(values))
                        .map_err(tx_err)?;
                }
                appender.flush().map_err(tx_err)?;
            }
            tx.commit().map_err(tx_err)
        })
    }
}

impl TableLoader for BulkLoader<'_> {
    fn load(&self, source: &Path, table: &TableRef) -> Result<LoadReport, LoadError> {
        let started = Instant::now();
        let batch = RawBatch::read_csv(source)?.normalized();
        let destination = self.check_columns(table, &batch.columns)?;
        self.replace_rows(table, &destination, &batch)?;

        tracing::info!(
            table = %table,
            source = %source.display(),
            rows = batch.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "replaced table contents"
        );

        Ok(LoadReport {
            source: source.to_path_buf(),
            table: table.clone(),
            rows: batch.len(),
            loaded_at: Utc::now(),
        })
    }
}
