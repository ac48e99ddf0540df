//! Presentation defaults.

use serde::{Deserialize, Serialize};

/// Bounds the row-limit picker accepts.
pub const LIMIT_RANGE: std::ops::RangeInclusive<i64> = 5..=50;

const fn default_limit() -> i64 {
    15
}

const fn default_fallback_season() -> i32 {
    2023
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Rows shown by ranked queries when the caller gives no limit.
    #[serde(default = "default_limit")]
    pub default_limit: i64,

    /// Season shown when the warehouse has none from 2019 on.
    #[serde(default = "default_fallback_season")]
    pub fallback_season: i32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            fallback_season: default_fallback_season(),
        }
    }
}
