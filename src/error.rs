//! Error types for mygit

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mygit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mygit operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid object kind: {0}")]
    InvalidKind(String),

    #[error("Corrupt object: {0}")]
    CorruptObject(String),

    #[error("Not a valid object name: {0}")]
    ObjectNotFound(String),

    #[error("Storage unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an I/O failure with the path it happened on
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::StorageUnavailable {
            path: path.into(),
            source,
        }
    }
}
