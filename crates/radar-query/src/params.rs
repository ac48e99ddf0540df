//! Validated query parameters.
//!
//! Callers hand in plain integers; these types are the only way into a cache
//! key or a SQL parameter, so invalid values never reach the store.

use serde::Serialize;

use crate::QueryError;

/// A tournament season (the calendar year the tournament is played in).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Season(i32);

impl Season {
    /// # Errors
    ///
    /// [`QueryError::InvalidParameter`] for zero or negative seasons.
    pub fn new(value: i32) -> Result<Self, QueryError> {
        if value <= 0 {
            return Err(QueryError::InvalidParameter {
                name: "season",
                reason: format!("must be a positive year, got {value}"),
            });
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Maximum number of rows a ranked query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Limit(i64);

impl Limit {
    /// # Errors
    ///
    /// [`QueryError::InvalidParameter`] for zero or negative limits.
    pub fn new(value: i64) -> Result<Self, QueryError> {
        if value <= 0 {
            return Err(QueryError::InvalidParameter {
                name: "limit",
                reason: format!("must be a positive integer, got {value}"),
            });
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}
