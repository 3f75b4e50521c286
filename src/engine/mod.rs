//! Engine facade.
//!
//! The narrow contract the surrounding service layer calls into:
//! `predict`, `train`, `list_models`. The engine performs no
//! authentication or authorization; it trusts the caller and accepts an
//! opaque identity for audit logging only.

mod errors;

pub use errors::{EngineError, EngineResult};

use std::sync::Arc;

use crate::artifact::ModelSummary;
use crate::config::EngineConfig;
use crate::inference::{InferencePipeline, PredictOptions, PredictResult, PredictionResult};
use crate::observability::{Event, Logger, Severity};
use crate::sink::{NullSink, PredictionSink, SinkDispatcher};
use crate::store::{ActiveModel, ModelStore, StoreError, StoreResult};
use crate::training::{
    bootstrap, TrainingExample, TrainingOptions, TrainingPipeline, TrainingReport, TrainingResult,
};

/// The classification engine.
///
/// All entry points take `&self` and the engine is `Send + Sync`, so a
/// pool of worker threads may share one instance.
#[derive(Debug)]
pub struct Engine {
    store: Arc<ModelStore>,
    active: Arc<ActiveModel>,
    training: TrainingPipeline,
    inference: InferencePipeline,
}

impl Engine {
    /// Opens the engine without a prediction sink.
    pub fn open(config: EngineConfig) -> EngineResult<Self> {
        Self::open_with_sink(config, Arc::new(NullSink))
    }

    /// Opens the engine, loading the most recent artifact or
    /// bootstrapping a default one when the registry is empty.
    ///
    /// After this returns, the active pointer is always set; inference
    /// can never observe an unset model.
    pub fn open_with_sink(
        config: EngineConfig,
        sink: Arc<dyn PredictionSink>,
    ) -> EngineResult<Self> {
        Logger::log(Severity::Info, Event::EngineStart, &[]);

        let store = Arc::new(ModelStore::open(&config.models_dir)?);

        let initial = match store.latest() {
            Ok(artifact) => artifact,
            Err(StoreError::Empty) => {
                bootstrap(&store, &config).map_err(EngineError::Bootstrap)?
            }
            Err(e) => return Err(e.into()),
        };

        Logger::log(
            Severity::Info,
            Event::EngineReady,
            &[("active_version", &initial.id)],
        );

        let active = Arc::new(ActiveModel::new(Arc::new(initial)));
        let training = TrainingPipeline::new(Arc::clone(&store), Arc::clone(&active), &config);
        let inference = InferencePipeline::new(
            Arc::clone(&store),
            Arc::clone(&active),
            SinkDispatcher::new(sink),
        );

        Ok(Self {
            store,
            active,
            training,
            inference,
        })
    }

    /// Classifies text with the active artifact.
    pub fn predict(&self, input: &str) -> PredictResult<PredictionResult> {
        self.inference.predict(input)
    }

    /// Classifies text with a version override and/or caller identity.
    pub fn predict_with_options(
        &self,
        input: &str,
        options: &PredictOptions,
    ) -> PredictResult<PredictionResult> {
        self.inference.predict_with_options(input, options)
    }

    /// Trains a new model on labeled examples and activates it.
    pub fn train(&self, examples: &[TrainingExample]) -> TrainingResult<TrainingReport> {
        self.training.train(examples)
    }

    /// [`train`](Self::train) with a label and cancellation token.
    pub fn train_with_options(
        &self,
        examples: &[TrainingExample],
        options: &TrainingOptions,
    ) -> TrainingResult<TrainingReport> {
        self.training.train_with_options(examples, options)
    }

    /// Lists persisted artifacts, newest first.
    pub fn list_models(&self) -> StoreResult<Vec<ModelSummary>> {
        self.store.list()
    }

    /// Id of the artifact currently serving predictions.
    pub fn active_version(&self) -> String {
        self.active.version()
    }
}
