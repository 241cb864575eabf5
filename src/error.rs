//! Application-wide error types.
//!
//! Startup failures (catalog, audio output) bubble up to `main` through
//! [`Error`]. Failures while the player is running are logged instead.

use std::path::PathBuf;

use crate::catalog::CatalogError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Terminal or file I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file or environment could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Settings were read but hold values outside their valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A global subscriber was already installed
    #[error("Logging setup error: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The default audio output device could not be opened
    #[error("Audio output error: {0}")]
    AudioOutput(String),

    #[error("Failed to open {path}: {source}")]
    MediaOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {source}")]
    MediaDecode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}
