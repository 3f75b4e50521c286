//! Engine configuration.

use std::path::PathBuf;

use crate::featurizer::DEFAULT_MAX_VOCABULARY;

/// Configuration for the classification engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding the artifact registry.
    pub models_dir: PathBuf,
    /// Bound on the fitted vocabulary size.
    pub max_vocabulary: usize,
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Full-batch epochs per training run.
    pub epochs: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("models"),
            max_vocabulary: DEFAULT_MAX_VOCABULARY,
            learning_rate: 0.5,
            epochs: 300,
        }
    }
}

impl EngineConfig {
    /// Config rooted at the given models directory, defaults elsewhere.
    pub fn with_models_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: dir.into(),
            ..Self::default()
        }
    }
}
