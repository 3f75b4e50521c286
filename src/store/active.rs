//! The active model pointer.
//!
//! Single writer, many readers, copy-on-write: readers clone the `Arc`
//! once and keep a consistent snapshot for their whole call, so a
//! concurrent publish can never hand a reader the featurizer of one
//! artifact and the classifier of another.

use std::sync::{Arc, RwLock};

use crate::artifact::ModelArtifact;

/// Process-wide reference to the artifact serving predictions.
#[derive(Debug)]
pub struct ActiveModel {
    current: RwLock<Arc<ModelArtifact>>,
}

impl ActiveModel {
    /// Initializes the pointer with the artifact loaded at startup.
    pub fn new(initial: Arc<ModelArtifact>) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    /// Returns a consistent snapshot of the active artifact.
    pub fn snapshot(&self) -> Arc<ModelArtifact> {
        // The lock only ever guards a fully formed Arc, so a poisoned
        // lock still holds a valid value; recover it.
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Publishes a newer artifact.
    ///
    /// The swap only happens when `next` is strictly newer by
    /// `(created_at, id)`; out-of-order publishes from concurrent
    /// training runs therefore converge on the last-created artifact
    /// regardless of completion interleaving. Returns whether `next`
    /// became active.
    pub fn publish(&self, next: Arc<ModelArtifact>) -> bool {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if next.ordering_key() > guard.ordering_key() {
            *guard = next;
            true
        } else {
            false
        }
    }

    /// Id of the currently active artifact.
    pub fn version(&self) -> String {
        self.snapshot().id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ArtifactDraft, ArtifactPayload, ModelMetrics};
    use crate::classifier::LogisticRegression;
    use crate::featurizer::TfIdfFeaturizer;
    use chrono::{Duration, Utc};

    fn artifact_at(offset_ms: i64) -> Arc<ModelArtifact> {
        let created_at = Utc::now() + Duration::milliseconds(offset_ms);
        let payload = ArtifactPayload {
            featurizer: TfIdfFeaturizer::fit(&["win now".to_string()], 10),
            classifier: LogisticRegression::new(2, 0.5, 10),
        };
        let draft = ArtifactDraft {
            label: None,
            training_sample_count: 1,
            metrics: ModelMetrics {
                accuracy: 1.0,
                precision: 1.0,
                recall: 1.0,
                f1: 1.0,
            },
            payload,
        };
        Arc::new(
            ModelArtifact::seal(draft, ModelArtifact::generate_id(created_at), created_at)
                .unwrap(),
        )
    }

    #[test]
    fn test_snapshot_returns_initial() {
        let initial = artifact_at(0);
        let active = ActiveModel::new(Arc::clone(&initial));
        assert_eq!(active.snapshot().id, initial.id);
    }

    #[test]
    fn test_publish_newer_swaps() {
        let active = ActiveModel::new(artifact_at(0));
        let newer = artifact_at(10);
        assert!(active.publish(Arc::clone(&newer)));
        assert_eq!(active.version(), newer.id);
    }

    #[test]
    fn test_publish_older_is_rejected() {
        let newer = artifact_at(10);
        let active = ActiveModel::new(Arc::clone(&newer));
        let older = artifact_at(-10);
        assert!(!active.publish(older));
        assert_eq!(active.version(), newer.id);
    }

    #[test]
    fn test_snapshot_survives_publish() {
        let first = artifact_at(0);
        let active = ActiveModel::new(Arc::clone(&first));
        let snapshot = active.snapshot();
        active.publish(artifact_at(10));
        // The reader's snapshot still points at the artifact it started
        // with.
        assert_eq!(snapshot.id, first.id);
    }
}
