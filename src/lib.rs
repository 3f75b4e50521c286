//! sieved - spam/ham text classification with a durable model lifecycle
//!
//! The crate owns the model lifecycle end to end: fitting a featurizer
//! and classifier from labeled examples, persisting the result as an
//! immutable artifact, selecting the active artifact, and serving
//! predictions with a confidence score and a rule-based rationale.
//!
//! Transport, authentication, and prediction history storage are
//! collaborators of this crate, not parts of it. The surrounding
//! service layer calls [`engine::Engine`] in-process.

pub mod artifact;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod explain;
pub mod featurizer;
pub mod inference;
pub mod observability;
pub mod sink;
pub mod store;
pub mod text;
pub mod training;

pub use artifact::{ModelArtifact, ModelMetrics, ModelSummary};
pub use classifier::Label;
pub use config::EngineConfig;
pub use engine::{Engine, EngineError};
pub use explain::Explanation;
pub use inference::{PredictError, PredictOptions, PredictionResult};
pub use sink::{MemorySink, NullSink, PredictionRecord, PredictionSink};
pub use store::{ModelStore, StoreError};
pub use training::{
    CancelToken, TrainingError, TrainingExample, TrainingOptions, TrainingReport,
};
