//! Engine startup errors.

use thiserror::Error;

use crate::store::StoreError;
use crate::training::TrainingError;

/// Result type for engine startup.
pub type EngineResult<T> = Result<T, EngineError>;

/// Fatal startup conditions.
///
/// Per-request failures carry their own taxonomies
/// ([`crate::inference::PredictError`], [`crate::training::TrainingError`],
/// [`StoreError`]); this enum only covers conditions under which the
/// engine cannot come up at all.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The model store could not be opened or scanned.
    #[error("failed to open model store: {0}")]
    Store(#[from] StoreError),

    /// The default model could not be produced on an empty registry.
    /// This is the one recovery path that must never fail.
    #[error("default model bootstrap failed: {0}")]
    Bootstrap(#[source] TrainingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_display() {
        let err = EngineError::Bootstrap(TrainingError::InsufficientData(
            "seed corpus invalid".to_string(),
        ));
        assert!(err.to_string().contains("bootstrap failed"));
    }
}
