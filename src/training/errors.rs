//! Training pipeline errors.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for training operations.
pub type TrainingResult<T> = Result<T, TrainingError>;

/// Training pipeline errors.
#[derive(Debug, Error)]
pub enum TrainingError {
    /// The training set is empty, missing a class, or otherwise unfit
    /// for supervised fitting. Rejected before any fitting work.
    #[error("insufficient training data: {0}")]
    InsufficientData(String),

    /// The caller cancelled the run. Nothing was persisted and the
    /// active pointer is untouched.
    #[error("training run was cancelled")]
    Cancelled,

    /// Persisting the fitted artifact failed. The active pointer is
    /// untouched.
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_display() {
        let err = TrainingError::InsufficientData("training set is empty".to_string());
        assert!(err.to_string().contains("training set is empty"));
    }

    #[test]
    fn test_store_error_passes_through() {
        let err = TrainingError::from(StoreError::Empty);
        assert!(err.to_string().contains("empty"));
    }
}
