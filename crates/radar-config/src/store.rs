//! Warehouse location.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreConfig {
    /// `DuckDB` database file, or `:memory:`. Empty means not configured.
    #[serde(default)]
    pub path: String,
}

impl StoreConfig {
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        !self.path.is_empty()
    }
}
