//! Prediction errors.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for prediction operations.
pub type PredictResult<T> = Result<T, PredictError>;

/// Prediction errors.
#[derive(Debug, Error)]
pub enum PredictError {
    /// The input text is empty after normalization. Classifying the
    /// empty string is degenerate, so it is rejected outright.
    #[error("input text is empty after normalization")]
    EmptyInput,

    /// The requested model version is not in the registry.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The requested model exists but cannot be used.
    #[error("model {id} could not be loaded: {reason}")]
    ModelLoad { id: String, reason: String },
}

impl PredictError {
    /// Maps a store failure for `version` into the prediction taxonomy.
    pub(crate) fn from_store(version: &str, error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => PredictError::ModelNotFound(id),
            StoreError::Corrupt { id, reason } => PredictError::ModelLoad { id, reason },
            StoreError::Empty => PredictError::ModelNotFound(version.to_string()),
            StoreError::Io { path, source } => PredictError::ModelLoad {
                id: version.to_string(),
                reason: format!("I/O failure at {}: {}", path.display(), source),
            },
        }
    }
}
