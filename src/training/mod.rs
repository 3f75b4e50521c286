//! Supervised training pipeline.
//!
//! Fit, self-evaluate, persist, publish — in that order. The artifact
//! is written through the store before the active pointer moves, so a
//! failed save can never advance the pointer, and a long-running fit
//! never blocks predictions against the previously active artifact.

mod bootstrap;
mod cancel;
mod errors;
mod metrics;

pub use bootstrap::{bootstrap, BOOTSTRAP_LABEL};
pub use cancel::CancelToken;
pub use errors::{TrainingError, TrainingResult};
pub use metrics::evaluate;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::artifact::{ArtifactDraft, ArtifactPayload, ModelMetrics};
use crate::classifier::{Label, LogisticRegression};
use crate::config::EngineConfig;
use crate::featurizer::TfIdfFeaturizer;
use crate::observability::{Event, Logger, Severity};
use crate::store::{ActiveModel, ModelStore};
use crate::text;

/// How many descent epochs run between cancellation checks.
const CANCEL_CHECK_INTERVAL: u32 = 16;

/// One labeled training example. Order within a training set is
/// preserved end to end for reproducibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub label: Label,
}

impl TrainingExample {
    pub fn new(text: impl Into<String>, label: Label) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// Result of a completed training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub artifact_id: String,
    pub metrics: ModelMetrics,
    pub training_sample_count: u64,
}

/// Optional knobs for one training run.
#[derive(Debug, Clone, Default)]
pub struct TrainingOptions {
    /// Caller-supplied label recorded on the artifact as metadata.
    pub label: Option<String>,
    /// Cancellation flag checked throughout the run.
    pub cancel: Option<CancelToken>,
}

/// Fits artifacts from labeled examples and publishes them.
#[derive(Debug)]
pub struct TrainingPipeline {
    store: Arc<ModelStore>,
    active: Arc<ActiveModel>,
    max_vocabulary: usize,
    learning_rate: f64,
    epochs: u32,
}

impl TrainingPipeline {
    pub fn new(store: Arc<ModelStore>, active: Arc<ActiveModel>, config: &EngineConfig) -> Self {
        Self {
            store,
            active,
            max_vocabulary: config.max_vocabulary,
            learning_rate: config.learning_rate,
            epochs: config.epochs,
        }
    }

    /// Trains a new model and publishes it as the active artifact.
    pub fn train(&self, examples: &[TrainingExample]) -> TrainingResult<TrainingReport> {
        self.train_with_options(examples, &TrainingOptions::default())
    }

    /// [`train`](Self::train) with a caller-supplied label and
    /// cancellation token.
    pub fn train_with_options(
        &self,
        examples: &[TrainingExample],
        options: &TrainingOptions,
    ) -> TrainingResult<TrainingReport> {
        if let Err(e) = validate(examples) {
            Logger::log(
                Severity::Warn,
                Event::TrainRejected,
                &[("reason", &e.to_string())],
            );
            return Err(e);
        }

        Logger::log(
            Severity::Info,
            Event::TrainStart,
            &[("training_sample_count", &examples.len().to_string())],
        );

        let cancel = options.cancel.clone().unwrap_or_default();
        let draft = match fit_draft(
            examples,
            options.label.clone(),
            self.max_vocabulary,
            self.learning_rate,
            self.epochs,
            &cancel,
        ) {
            Ok(draft) => draft,
            Err(e) => {
                if matches!(e, TrainingError::Cancelled) {
                    Logger::log(Severity::Info, Event::TrainCancelled, &[]);
                }
                return Err(e);
            }
        };

        // Write-then-swap: the pointer only moves once the artifact is
        // durable.
        let artifact = Arc::new(self.store.save(draft)?);
        if self.active.publish(Arc::clone(&artifact)) {
            Logger::log(
                Severity::Info,
                Event::ActiveSwapped,
                &[("artifact_id", &artifact.id)],
            );
        }

        Logger::log(
            Severity::Info,
            Event::TrainComplete,
            &[
                ("artifact_id", &artifact.id),
                ("accuracy", &format!("{:.4}", artifact.metrics.accuracy)),
            ],
        );

        Ok(TrainingReport {
            artifact_id: artifact.id.clone(),
            metrics: artifact.metrics,
            training_sample_count: artifact.training_sample_count,
        })
    }
}

/// Rejects training sets that cannot produce a usable binary model.
fn validate(examples: &[TrainingExample]) -> TrainingResult<()> {
    if examples.is_empty() {
        return Err(TrainingError::InsufficientData(
            "training set is empty".to_string(),
        ));
    }

    for (index, example) in examples.iter().enumerate() {
        if text::normalize(&example.text).is_empty() {
            return Err(TrainingError::InsufficientData(format!(
                "example {} has empty text",
                index
            )));
        }
    }

    let has_spam = examples.iter().any(|e| e.label == Label::Spam);
    let has_ham = examples.iter().any(|e| e.label == Label::Ham);
    if !has_spam {
        return Err(TrainingError::InsufficientData(
            "training set contains no spam examples".to_string(),
        ));
    }
    if !has_ham {
        return Err(TrainingError::InsufficientData(
            "training set contains no ham examples".to_string(),
        ));
    }

    Ok(())
}

/// Fits featurizer and classifier and assembles an unsealed draft.
///
/// Shared by real training and bootstrap. Checks the cancellation token
/// between stages and every [`CANCEL_CHECK_INTERVAL`] epochs; a
/// cancelled run returns without having touched the store.
pub(crate) fn fit_draft(
    examples: &[TrainingExample],
    label: Option<String>,
    max_vocabulary: usize,
    learning_rate: f64,
    epochs: u32,
    cancel: &CancelToken,
) -> TrainingResult<ArtifactDraft> {
    check_cancel(cancel)?;

    let texts: Vec<String> = examples.iter().map(|e| text::normalize(&e.text)).collect();
    let featurizer = TfIdfFeaturizer::fit(&texts, max_vocabulary);

    check_cancel(cancel)?;

    let features: Vec<Vec<f64>> = texts.iter().map(|t| featurizer.transform(t)).collect();
    let targets: Vec<f64> = examples.iter().map(|e| e.label.target()).collect();

    let mut classifier =
        LogisticRegression::new(featurizer.vocabulary_size(), learning_rate, epochs);
    for epoch in 0..epochs {
        if epoch % CANCEL_CHECK_INTERVAL == 0 {
            check_cancel(cancel)?;
        }
        classifier.run_epoch(&features, &targets);
    }

    check_cancel(cancel)?;

    let predicted: Vec<Label> = features.iter().map(|row| classifier.predict(row)).collect();
    let actual: Vec<Label> = examples.iter().map(|e| e.label).collect();
    let metrics = evaluate(&predicted, &actual);

    Ok(ArtifactDraft {
        label,
        training_sample_count: examples.len() as u64,
        metrics,
        payload: ArtifactPayload {
            featurizer,
            classifier,
        },
    })
}

fn check_cancel(cancel: &CancelToken) -> TrainingResult<()> {
    if cancel.is_cancelled() {
        return Err(TrainingError::Cancelled);
    }
    Ok(())
}
