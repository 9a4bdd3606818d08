//! Error types for permission loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or reloading permissions.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// Another reload currently holds the reload lock.
    #[error("a permissions reload is already in progress")]
    ReloadInProgress,

    /// Reload requested but no configuration file was configured.
    #[error("no permissions file configured")]
    NoSource,

    /// The configuration file could not be read.
    #[error("cannot read permissions file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is malformed.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}
