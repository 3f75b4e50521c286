//! Inference pipeline: raw text in, classified result out.
//!
//! Each prediction resolves one artifact (the active one, or an
//! explicitly requested historical version), takes a consistent
//! snapshot of it for the whole call, and never mutates shared state.
//! Sink notification is a side effect that cannot fail the prediction.

mod errors;

pub use errors::{PredictError, PredictResult};

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::artifact::ModelArtifact;
use crate::classifier::Label;
use crate::explain::{Explanation, ExplanationEngine};
use crate::observability::{Event, Logger, Severity};
use crate::sink::{PredictionRecord, SinkDispatcher};
use crate::store::{ActiveModel, ModelStore};
use crate::text;

/// Sentinel version string that resolves to the active artifact.
pub const LATEST_VERSION: &str = "latest";

/// A classified piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: Label,
    /// Probability mass of the predicted class. For the binary argmax
    /// decision rule this lies in [0.5, 1.0] — it is not the
    /// probability of spam.
    pub confidence: f64,
    pub explanation: Explanation,
    /// Id of the artifact that served this prediction.
    pub model_version: String,
}

/// Optional knobs for one prediction.
#[derive(Debug, Clone, Default)]
pub struct PredictOptions {
    /// Artifact id to use instead of the active one. `None` and
    /// [`LATEST_VERSION`] both mean the active artifact.
    pub model_version: Option<String>,
    /// Opaque caller identity for audit logging. When present, the
    /// prediction is dispatched to the sink.
    pub identity: Option<String>,
}

/// Serves predictions against the active (or a requested) artifact.
#[derive(Debug)]
pub struct InferencePipeline {
    store: Arc<ModelStore>,
    active: Arc<ActiveModel>,
    dispatcher: SinkDispatcher,
}

impl InferencePipeline {
    pub fn new(store: Arc<ModelStore>, active: Arc<ActiveModel>, dispatcher: SinkDispatcher) -> Self {
        Self {
            store,
            active,
            dispatcher,
        }
    }

    /// Classifies `text` with the active artifact.
    pub fn predict(&self, input: &str) -> PredictResult<PredictionResult> {
        self.predict_with_options(input, &PredictOptions::default())
    }

    /// [`predict`](Self::predict) with version override and caller
    /// identity.
    pub fn predict_with_options(
        &self,
        input: &str,
        options: &PredictOptions,
    ) -> PredictResult<PredictionResult> {
        let artifact = self.resolve(options.model_version.as_deref())?;

        let normalized = text::normalize(input);
        if normalized.is_empty() {
            return Err(PredictError::EmptyInput);
        }

        // Out-of-vocabulary terms degrade to zero weight, never error.
        let features = artifact.payload.featurizer.transform(&normalized);
        let spam_probability = artifact.payload.classifier.probability(&features);

        let (label, confidence) = if spam_probability >= 0.5 {
            (Label::Spam, spam_probability)
        } else {
            (Label::Ham, 1.0 - spam_probability)
        };

        // The rationale works on the original text, not the normalized
        // form.
        let explanation = ExplanationEngine::explain(input, label);

        let result = PredictionResult {
            label,
            confidence,
            explanation,
            model_version: artifact.id.clone(),
        };

        Logger::log(
            Severity::Trace,
            Event::PredictionServed,
            &[
                ("label", label.as_str()),
                ("confidence", &format!("{:.4}", confidence)),
                ("model_version", &result.model_version),
            ],
        );

        if let Some(identity) = &options.identity {
            self.dispatcher.dispatch(PredictionRecord {
                identity: identity.clone(),
                text: input.to_string(),
                label,
                confidence,
                model_version: result.model_version.clone(),
                recorded_at: Utc::now(),
            });
        }

        Ok(result)
    }

    /// Resolves the artifact a prediction should run against.
    fn resolve(&self, version: Option<&str>) -> PredictResult<Arc<ModelArtifact>> {
        match version {
            None => Ok(self.active.snapshot()),
            Some(v) if v == LATEST_VERSION => Ok(self.active.snapshot()),
            Some(v) => self
                .store
                .load(v)
                .map(Arc::new)
                .map_err(|e| PredictError::from_store(v, e)),
        }
    }
}
