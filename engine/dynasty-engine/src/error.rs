//! Error types for the dynasty engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {message}")]
    InvalidValue { message: String },
}

/// A position code outside the modeled set (QB, RB, WR, TE, K, DL, LB, DB)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown position: {0}")]
pub struct UnknownPosition(pub String);
