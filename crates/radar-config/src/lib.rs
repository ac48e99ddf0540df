//! # radar-config
//!
//! Layered configuration loading for Upset Radar using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`RADAR_*` prefix, `__` as separator)
//! 2. Legacy `RAW_DIR` environment variable, mapped to `ingest.raw_dir`
//! 3. Project-level `radar.toml`
//! 4. User-level `~/.config/upset-radar/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! `RADAR_STORE__PATH` -> `store.path`, `RADAR_CACHE__TTL_SECS` -> `cache.ttl_secs`.
//!
//! # Usage
//!
//! ```no_run
//! use radar_config::RadarConfig;
//!
//! let config = RadarConfig::load_with_dotenv().expect("config");
//! let store = config.require_store().expect("store.path is set");
//! println!("warehouse: {}", store.path);
//! ```

mod cache;
mod error;
mod general;
mod ingest;
mod store;

pub use cache::CacheConfig;
pub use error::ConfigError;
pub use general::{GeneralConfig, LIMIT_RANGE};
pub use ingest::IngestConfig;
pub use store::StoreConfig;

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Project-local config file, relative to the working directory.
pub const LOCAL_CONFIG_FILE: &str = "radar.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RadarConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl RadarConfig {
    /// Load and validate configuration from TOML files and environment variables.
    ///
    /// Does NOT read `.env`; use [`Self::load_with_dotenv`] for that.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Figment`] on parse or type errors,
    /// [`ConfigError::InvalidValue`] on out-of-range values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load `.env` from the working directory (if present), then [`Self::load`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary provider chain.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path().filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
            .merge(
                Env::raw()
                    .only(&["RAW_DIR"])
                    .map(|_| "ingest.raw_dir".into()),
            )
            .merge(Env::prefixed("RADAR_").split("__"))
    }

    /// Range checks figment cannot express.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache.ttl_secs",
                reason: "must be greater than zero".into(),
            });
        }
        if !LIMIT_RANGE.contains(&self.general.default_limit) {
            return Err(ConfigError::InvalidValue {
                field: "general.default_limit",
                reason: format!(
                    "must be between {} and {}, got {}",
                    LIMIT_RANGE.start(),
                    LIMIT_RANGE.end(),
                    self.general.default_limit
                ),
            });
        }
        if self.general.fallback_season <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.fallback_season",
                reason: format!("must be a positive year, got {}", self.general.fallback_season),
            });
        }
        Ok(())
    }

    /// The store section, or an error if no warehouse path is set.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotConfigured`] when `store.path` is empty.
    pub const fn require_store(&self) -> Result<&StoreConfig, ConfigError> {
        if self.store.is_configured() {
            Ok(&self.store)
        } else {
            Err(ConfigError::NotConfigured {
                section: "store",
                hint: "RADAR_STORE__PATH or [store] path in radar.toml",
            })
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("upset-radar").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_config_is_valid_but_has_no_store() {
        let config = RadarConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.store.is_configured());
        assert_eq!(config.ingest.raw_dir, PathBuf::from("data/raw"));
        assert_eq!(config.cache.ttl_secs, 300);
    }

    #[test]
    fn require_store_reports_missing_path() {
        let err = RadarConfig::default().require_store().unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { section: "store", .. }));
        assert!(err.to_string().contains("RADAR_STORE__PATH"));
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let mut config = RadarConfig::default();
        config.cache.ttl_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "cache.ttl_secs", .. }));
    }

    #[test]
    fn default_limit_outside_picker_range_is_rejected() {
        let mut config = RadarConfig::default();
        config.general.default_limit = 51;
        assert!(config.validate().is_err());
        config.general.default_limit = 50;
        assert!(config.validate().is_ok());
    }
}
