//! Immutable model artifact schema.
//!
//! An artifact bundles a fitted featurizer and classifier with the
//! evaluation metrics of the training run that produced them. The
//! serialized form is self-describing JSON with an explicit
//! `format_version` and a CRC32 checksum over the canonical payload
//! bytes, so incompatible or damaged files fail loudly instead of being
//! silently misinterpreted.
//!
//! Artifacts are immutable once persisted; a new training run always
//! produces a new artifact.

mod checksum;
mod errors;

pub use checksum::{compute_checksum, format_checksum, parse_checksum};
pub use errors::{ArtifactError, ArtifactResult};

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classifier::LogisticRegression;
use crate::featurizer::TfIdfFeaturizer;

/// Current artifact schema version. Bump on incompatible changes.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Training-set self-evaluation metrics, each in [0, 1].
///
/// These are computed on the training set itself, not a held-out
/// split; they measure fit, not generalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ModelMetrics {
    /// True when every metric lies in [0, 1].
    pub fn in_bounds(&self) -> bool {
        [self.accuracy, self.precision, self.recall, self.f1]
            .iter()
            .all(|m| (0.0..=1.0).contains(m))
    }
}

/// The learned state carried by an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactPayload {
    pub featurizer: TfIdfFeaturizer,
    pub classifier: LogisticRegression,
}

impl ArtifactPayload {
    /// Canonical bytes the payload checksum is computed over.
    ///
    /// Serialization is deterministic: the featurizer vocabulary is a
    /// `BTreeMap` and every other field has a fixed order.
    pub fn canonical_bytes(&self) -> ArtifactResult<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| ArtifactError::Malformed(format!("payload serialization failed: {}", e)))
    }
}

/// Everything a training run produces before the store assigns identity.
///
/// The store seals a draft into a [`ModelArtifact`] under its writer
/// lock, so `id` and `created_at` assignment is serialized with the
/// actual publish.
#[derive(Debug, Clone)]
pub struct ArtifactDraft {
    pub label: Option<String>,
    pub training_sample_count: u64,
    pub metrics: ModelMetrics,
    pub payload: ArtifactPayload,
}

/// An immutable, persisted model bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Schema version of this file.
    pub format_version: u32,
    /// Unique, sortable identifier: `model-<UTC stamp>-<uuid fragment>`.
    pub id: String,
    /// Optional caller-supplied training label. Metadata only; never
    /// used for selection or file naming.
    #[serde(default)]
    pub label: Option<String>,
    /// Creation time recorded at save time. All "latest" comparisons
    /// use this field, never filesystem timestamps.
    pub created_at: DateTime<Utc>,
    pub training_sample_count: u64,
    pub metrics: ModelMetrics,
    pub payload: ArtifactPayload,
    /// `crc32:XXXXXXXX` over the canonical payload bytes.
    pub checksum: String,
}

impl ModelArtifact {
    /// Seals a draft with its assigned identity and creation time.
    pub fn seal(
        draft: ArtifactDraft,
        id: String,
        created_at: DateTime<Utc>,
    ) -> ArtifactResult<Self> {
        let bytes = draft.payload.canonical_bytes()?;
        let checksum = format_checksum(compute_checksum(&bytes));
        Ok(Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            id,
            label: draft.label,
            created_at,
            training_sample_count: draft.training_sample_count,
            metrics: draft.metrics,
            payload: draft.payload,
            checksum,
        })
    }

    /// Generates a unique, sortable artifact id for the given creation
    /// time.
    ///
    /// The millisecond UTC stamp makes ids sort in creation order; the
    /// UUID fragment makes them collision-free even within the same
    /// millisecond.
    pub fn generate_id(created_at: DateTime<Utc>) -> String {
        let stamp = created_at.format("%Y%m%dT%H%M%S%3fZ");
        let fragment = Uuid::new_v4().simple().to_string();
        format!("model-{}-{}", stamp, &fragment[..8])
    }

    /// Validates schema version, metric bounds, and payload checksum.
    pub fn verify(&self) -> ArtifactResult<()> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::Malformed(format!(
                "unsupported format_version {} (expected {})",
                self.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }
        if !self.metrics.in_bounds() {
            return Err(ArtifactError::Malformed(
                "metrics outside [0, 1]".to_string(),
            ));
        }
        let bytes = self.payload.canonical_bytes()?;
        let actual = format_checksum(compute_checksum(&bytes));
        if actual != self.checksum {
            return Err(ArtifactError::Malformed(format!(
                "payload checksum mismatch: stored {}, computed {}",
                self.checksum, actual
            )));
        }
        Ok(())
    }

    /// Serializes the artifact to pretty-printed JSON.
    pub fn to_json(&self) -> ArtifactResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ArtifactError::Malformed(format!("serialization failed: {}", e)))
    }

    /// Parses and verifies an artifact from JSON.
    pub fn from_json(json: &str) -> ArtifactResult<Self> {
        let artifact: Self = serde_json::from_str(json)
            .map_err(|e| ArtifactError::Malformed(format!("parse failed: {}", e)))?;
        artifact.verify()?;
        Ok(artifact)
    }

    /// Writes the artifact to a file and fsyncs it.
    pub fn write_to_file(&self, path: &Path) -> ArtifactResult<()> {
        let json = self.to_json()?;

        let mut file = File::create(path).map_err(|e| ArtifactError::io(path, e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| ArtifactError::io(path, e))?;
        file.sync_all().map_err(|e| ArtifactError::io(path, e))?;
        Ok(())
    }

    /// Reads and verifies an artifact from a file.
    pub fn read_from_file(path: &Path) -> ArtifactResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| ArtifactError::io(path, e))?;
        Self::from_json(&json)
    }

    /// Listing view of this artifact.
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            id: self.id.clone(),
            label: self.label.clone(),
            metrics: self.metrics,
            training_sample_count: self.training_sample_count,
            created_at: self.created_at,
        }
    }

    /// Total order used for "latest" selection: `created_at`, with `id`
    /// as the tie-break.
    pub fn ordering_key(&self) -> (DateTime<Utc>, &str) {
        (self.created_at, self.id.as_str())
    }
}

/// Listing entry for one persisted artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    pub metrics: ModelMetrics,
    pub training_sample_count: u64,
    pub created_at: DateTime<Utc>,
}
