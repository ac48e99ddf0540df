//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider failed to parse or a value had the wrong type.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A section the command needs has no value for its required field.
    #[error("Configuration section '{section}' is not configured (set {hint})")]
    NotConfigured {
        section: &'static str,
        hint: &'static str,
    },

    /// A field parsed but is outside its allowed range.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
