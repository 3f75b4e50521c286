//! Model store errors.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Model store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested artifact id is not in the registry.
    #[error("model not found: {0}")]
    NotFound(String),

    /// The artifact exists but its bytes cannot be trusted.
    #[error("model artifact {id} is corrupt: {reason}")]
    Corrupt { id: String, reason: String },

    /// The registry holds no readable artifact.
    #[error("model registry is empty")]
    Empty,

    /// Disk I/O failure.
    #[error("store I/O failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn corrupt(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
