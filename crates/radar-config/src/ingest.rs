//! Batch load settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_raw_dir() -> PathBuf {
    PathBuf::from("data/raw")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Directory holding the vendor CSV exports.
    #[serde(default = "default_raw_dir")]
    pub raw_dir: PathBuf,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            raw_dir: default_raw_dir(),
        }
    }
}
