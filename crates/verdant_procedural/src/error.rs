//! # Procedural Error Types
//!
//! Population itself never fails; these errors come from loading
//! configuration.

use thiserror::Error;
use verdant_weighted::WeightError;

/// Errors that can occur while loading populator configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A weight or amount in the config is out of range.
    #[error("invalid config: {0}")]
    Invalid(#[from] WeightError),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
