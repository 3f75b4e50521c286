//! Observable engine events.
//!
//! Events are explicit and typed; free-form event names are not
//! accepted by the logger.

use std::fmt;

/// Observable events in the engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Engine startup begins.
    EngineStart,
    /// Engine startup complete, active model loaded.
    EngineReady,

    /// No artifact in the registry; default model bootstrap begins.
    BootstrapStart,
    /// Default model persisted and activated.
    BootstrapComplete,

    /// A new artifact was persisted to the registry.
    ArtifactSaved,
    /// A registry entry could not be read and was skipped.
    ArtifactSkipped,
    /// The active model pointer moved to a newer artifact.
    ActiveSwapped,

    /// A training run was accepted and started.
    TrainStart,
    /// A training run produced and published an artifact.
    TrainComplete,
    /// A training run was cancelled by the caller.
    TrainCancelled,
    /// A training run was rejected before fitting.
    TrainRejected,

    /// A prediction was served.
    PredictionServed,
    /// The prediction sink rejected or failed to record a dispatch.
    SinkRecordFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::EngineStart => "engine_start",
            Event::EngineReady => "engine_ready",
            Event::BootstrapStart => "bootstrap_start",
            Event::BootstrapComplete => "bootstrap_complete",
            Event::ArtifactSaved => "artifact_saved",
            Event::ArtifactSkipped => "artifact_skipped",
            Event::ActiveSwapped => "active_swapped",
            Event::TrainStart => "train_start",
            Event::TrainComplete => "train_complete",
            Event::TrainCancelled => "train_cancelled",
            Event::TrainRejected => "train_rejected",
            Event::PredictionServed => "prediction_served",
            Event::SinkRecordFailed => "sink_record_failed",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
