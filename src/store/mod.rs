//! Durable model registry and active pointer.
//!
//! One JSON file per artifact under the models directory. Publishing is
//! atomic: the artifact is written to a `.json.tmp` sibling, fsynced,
//! and renamed into place, then the directory is fsynced. A reader can
//! never observe a partially written artifact, and `.tmp` residue from
//! a crash is invisible to `list`/`latest`.
//!
//! "Latest" selection orders by the `created_at` recorded inside each
//! artifact (with the id as tie-break), never by filesystem timestamps,
//! which are fragile under clock skew and concurrent writers.

mod active;
mod errors;

pub use active::ActiveModel;
pub use errors::{StoreError, StoreResult};

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::artifact::{ArtifactDraft, ArtifactError, ModelArtifact, ModelSummary};
use crate::observability::{Event, Logger, Severity};

/// File extension of persisted artifacts.
const ARTIFACT_EXTENSION: &str = "json";

/// Durable registry of model artifacts.
///
/// Writers are serialized by an internal mutex; readers open files
/// independently and never block on the writer.
#[derive(Debug)]
pub struct ModelStore {
    dir: PathBuf,
    writer: Mutex<WriterState>,
}

#[derive(Debug, Default)]
struct WriterState {
    /// Last creation timestamp handed out, for monotonicity within the
    /// process even when the clock stalls inside one millisecond.
    last_created_at: Option<DateTime<Utc>>,
}

impl ModelStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        Ok(Self {
            dir,
            writer: Mutex::new(WriterState::default()),
        })
    }

    /// The directory holding the registry.
    pub fn models_dir(&self) -> &Path {
        &self.dir
    }

    /// Seals a draft into a new immutable artifact and publishes it
    /// atomically.
    ///
    /// Identity (`id`, `created_at`) is assigned under the writer lock,
    /// so creation timestamps are strictly monotonic per process and
    /// match publish order. On any failure the temporary file is
    /// removed and the registry is unchanged.
    pub fn save(&self, draft: ArtifactDraft) -> StoreResult<ModelArtifact> {
        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let now = Utc::now();
        let created_at = match writer.last_created_at {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        writer.last_created_at = Some(created_at);

        let id = ModelArtifact::generate_id(created_at);
        let artifact = ModelArtifact::seal(draft, id.clone(), created_at)
            .map_err(|e| map_artifact_error(&id, e))?;

        let final_path = self.artifact_path(&id);
        let tmp_path = self.dir.join(format!("{}.{}.tmp", id, ARTIFACT_EXTENSION));

        if let Err(e) = artifact.write_to_file(&tmp_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(map_artifact_error(&id, e));
        }

        if let Err(e) = fs::rename(&tmp_path, &final_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::io(&final_path, e));
        }

        fsync_dir(&self.dir)?;

        Logger::log(
            Severity::Info,
            Event::ArtifactSaved,
            &[
                ("artifact_id", &id),
                (
                    "training_sample_count",
                    &artifact.training_sample_count.to_string(),
                ),
            ],
        );

        Ok(artifact)
    }

    /// Loads and verifies one artifact by id.
    pub fn load(&self, id: &str) -> StoreResult<ModelArtifact> {
        let path = self.artifact_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }

        let artifact =
            ModelArtifact::read_from_file(&path).map_err(|e| map_artifact_error(id, e))?;

        // A verified file whose embedded id disagrees with its name was
        // copied or renamed by hand; refuse to serve it under this id.
        if artifact.id != id {
            return Err(StoreError::corrupt(
                id,
                format!("artifact file carries id {}", artifact.id),
            ));
        }

        Ok(artifact)
    }

    /// Returns the artifact with the greatest `(created_at, id)`.
    ///
    /// Corrupt entries are skipped with a warning. Returns
    /// [`StoreError::Empty`] when no readable artifact exists; the
    /// engine bootstraps a default model on that signal.
    pub fn latest(&self) -> StoreResult<ModelArtifact> {
        self.readable_artifacts()?
            .into_iter()
            .max_by(|a, b| a.ordering_key().cmp(&b.ordering_key()))
            .ok_or(StoreError::Empty)
    }

    /// Lists all readable artifacts, newest first.
    ///
    /// Corrupt entries are skipped with a warning; one bad file never
    /// takes down the listing.
    pub fn list(&self) -> StoreResult<Vec<ModelSummary>> {
        let mut summaries: Vec<ModelSummary> = self
            .readable_artifacts()?
            .iter()
            .map(ModelArtifact::summary)
            .collect();
        summaries.sort_by(|a, b| {
            (b.created_at, b.id.as_str()).cmp(&(a.created_at, a.id.as_str()))
        });
        Ok(summaries)
    }

    fn artifact_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", id, ARTIFACT_EXTENSION))
    }

    /// Reads every verifiable artifact in the registry, skipping (and
    /// warning about) entries that fail to parse or verify.
    fn readable_artifacts(&self) -> StoreResult<Vec<ModelArtifact>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let mut artifacts = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.dir, e))?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            // `.json.tmp` files have extension "tmp" and fall out here.
            if path.extension().and_then(|e| e.to_str()) != Some(ARTIFACT_EXTENSION) {
                continue;
            }

            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
            match ModelArtifact::read_from_file(&path) {
                Ok(artifact) if artifact.id == stem => artifacts.push(artifact),
                Ok(artifact) => {
                    Logger::log(
                        Severity::Warn,
                        Event::ArtifactSkipped,
                        &[
                            ("path", &path.display().to_string()),
                            (
                                "reason",
                                &format!("artifact file carries id {}", artifact.id),
                            ),
                        ],
                    );
                }
                Err(e) => {
                    Logger::log(
                        Severity::Warn,
                        Event::ArtifactSkipped,
                        &[
                            ("path", &path.display().to_string()),
                            ("reason", &e.to_string()),
                        ],
                    );
                }
            }
        }

        Ok(artifacts)
    }
}

fn map_artifact_error(id: &str, error: ArtifactError) -> StoreError {
    match error {
        ArtifactError::Io { path, source } => StoreError::Io { path, source },
        ArtifactError::Malformed(reason) => StoreError::corrupt(id, reason),
    }
}

/// fsync a directory so a rename into it is durable.
fn fsync_dir(path: &Path) -> StoreResult<()> {
    let dir = OpenOptions::new()
        .read(true)
        .open(path)
        .map_err(|e| StoreError::io(path, e))?;
    dir.sync_all().map_err(|e| StoreError::io(path, e))
}
