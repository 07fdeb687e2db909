use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading season files
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to read season file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid season file {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid adapter payload: {0}")]
    Payload(#[from] serde_json::Error),
}
