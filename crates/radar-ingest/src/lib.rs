//! # radar-ingest
//!
//! Batch loader for the vendor CSV exports behind Upset Radar.
//!
//! ## Pipeline
//!
//! [`run_manifest`] walks a [`Manifest`] of `(file, raw table)` pairs in order.
//! For each pair the [`BulkLoader`]:
//! 1. reads the whole file into a [`RawBatch`],
//! 2. rewrites the header with [`normalize_column`] (`TeamID` → `team_id`),
//! 3. checks the header against the destination's columns,
//! 4. deletes every row and appends the new ones inside one `DuckDB` transaction.
//!
//! The first error stops the run. Tables loaded earlier in the same run keep
//! their new contents, and every table load is a full replacement, so running
//! again after fixing the source is always safe.

pub mod batch;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod normalize;

pub use batch::RawBatch;
pub use error::LoadError;
pub use loader::{BulkLoader, LoadReport, TableLoader};
pub use manifest::{Manifest, ManifestEntry, run_manifest};
pub use normalize::{normalize_column, normalize_header};
