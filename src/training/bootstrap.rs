//! Default model bootstrap.
//!
//! When the registry holds no artifact the engine must still answer
//! predictions, so startup fits a minimal default model from a fixed
//! seed corpus and persists it through the normal save path. This is
//! the one recovery path that must not fail: a bootstrap error is a
//! fatal startup condition, not a per-request error.

use crate::artifact::ModelArtifact;
use crate::classifier::Label;
use crate::config::EngineConfig;
use crate::observability::{Event, Logger, Severity};
use crate::store::ModelStore;

use super::cancel::CancelToken;
use super::errors::TrainingResult;
use super::{fit_draft, TrainingExample};

/// Label recorded on the bootstrap artifact.
pub const BOOTSTRAP_LABEL: &str = "default";

/// Fixed seed corpus for the default model. Both classes are
/// represented, so it passes the same validation as real training data.
pub(crate) fn seed_examples() -> Vec<TrainingExample> {
    vec![
        TrainingExample::new("This is a legitimate message", Label::Ham),
        TrainingExample::new("Buy now cheap viagra", Label::Spam),
        TrainingExample::new("Meeting at 3pm tomorrow", Label::Ham),
        TrainingExample::new("Win lottery now!!!", Label::Spam),
        TrainingExample::new("Hello friend", Label::Ham),
        TrainingExample::new("URGENT: Your account is suspended", Label::Spam),
    ]
}

/// Fits the default model from the seed corpus and persists it.
///
/// Runs through the same fitting path as real training, so the
/// resulting artifact is indistinguishable from a trained one apart
/// from its label.
pub fn bootstrap(store: &ModelStore, config: &EngineConfig) -> TrainingResult<ModelArtifact> {
    Logger::log(Severity::Info, Event::BootstrapStart, &[]);

    let examples = seed_examples();
    let draft = fit_draft(
        &examples,
        Some(BOOTSTRAP_LABEL.to_string()),
        config.max_vocabulary,
        config.learning_rate,
        config.epochs,
        &CancelToken::default(),
    )?;
    let artifact = store.save(draft)?;

    Logger::log(
        Severity::Info,
        Event::BootstrapComplete,
        &[("artifact_id", &artifact.id)],
    );
    Ok(artifact)
}
