//! # radar-query
//!
//! Read-only analytic queries behind the Upset Radar dashboard.
//!
//! [`UpsetQueries`] names the seven aggregates. [`MartQueries`] runs them
//! against the `mart` views of a [`radar_store::Warehouse`], and
//! [`CachedQueries`] wraps any implementation with a per-argument TTL cache
//! so repeated calls within the freshness window never touch the store.
//!
//! Results come back as a [`Table`] of typed [`Cell`]s with column names
//! taken from the SQL aliases.

pub mod bands;
pub mod cache;
pub mod cached;
pub mod error;
pub mod mart;
pub mod params;
pub mod queries;
pub mod table;

pub use bands::WinBand;
pub use cache::{Clock, QueryCache, SystemClock};
pub use cached::{CachedQueries, DEFAULT_TTL};
pub use error::QueryError;
pub use mart::{FIRST_SEASON, MartQueries};
pub use params::{Limit, Season};
pub use queries::{QueryKey, UpsetQueries, default_season};
pub use table::{Cell, Table};
