//! Artifact serialization errors.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for artifact operations.
pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// Artifact read/write errors.
///
/// `Malformed` covers everything that makes stored bytes untrustworthy:
/// parse failures, checksum mismatches, unknown schema versions, and
/// out-of-range fields. The store maps it to its corruption error.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact I/O failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed artifact: {0}")]
    Malformed(String),
}

impl ArtifactError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
