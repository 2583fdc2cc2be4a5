//! Error types surfaced by the router.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Errors returned while building or flushing a [`LogRouter`](crate::LogRouter).
///
/// Emission itself never fails from the caller's point of view.
#[derive(Debug, Error)]
pub enum LogError {
    /// The configured minimum level is not a recognized severity name.
    #[error("invalid log level: {0:?}")]
    InvalidLevel(String),

    /// The log directory could not be created or the file could not be opened.
    #[error("failed to open log file {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A sink failed to flush.
    #[error("failed to sync log sink: {0}")]
    Sync(#[source] io::Error),

    /// Another global `tracing` subscriber is already installed.
    #[error("failed to install global subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),

    /// Loading the configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
