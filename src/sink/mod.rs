//! Prediction sink collaborator.
//!
//! The engine does not own prediction history storage; it hands
//! completed predictions to a [`PredictionSink`] supplied by the
//! surrounding service layer. Dispatch is fire-and-forget: a background
//! worker drains a channel and a failing or slow sink never blocks or
//! fails the prediction that produced the record.

use std::fmt;
use std::sync::mpsc;
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classifier::Label;
use crate::observability::{Event, Logger, Severity};

/// One prediction, as handed to the sink for history/audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Opaque caller identity supplied by the authenticated transport
    /// layer. The engine never interprets it.
    pub identity: String,
    /// The original input text.
    pub text: String,
    pub label: Label,
    pub confidence: f64,
    pub model_version: String,
    pub recorded_at: DateTime<Utc>,
}

/// Sink errors.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for prediction records.
///
/// Implementations are provided by the service layer (a database, a
/// queue). They must tolerate being called from a background thread.
pub trait PredictionSink: Send + Sync + fmt::Debug {
    fn record(&self, record: &PredictionRecord) -> Result<(), SinkError>;
}

/// Sink that drops every record. Default when no collaborator is wired.
#[derive(Debug, Default)]
pub struct NullSink;

impl PredictionSink for NullSink {
    fn record(&self, _record: &PredictionRecord) -> Result<(), SinkError> {
        Ok(())
    }
}

/// In-memory sink for tests and local inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: RwLock<Vec<PredictionRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<PredictionRecord> {
        match self.records.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl PredictionSink for MemorySink {
    fn record(&self, record: &PredictionRecord) -> Result<(), SinkError> {
        let mut guard = match self.records.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(record.clone());
        Ok(())
    }
}

/// Fire-and-forget dispatcher in front of a [`PredictionSink`].
///
/// `dispatch` enqueues and returns immediately; a single worker thread
/// drains the queue and calls the sink. Sink failures are logged and
/// swallowed. Dropping the dispatcher closes the queue and joins the
/// worker after it drains the remaining records.
#[derive(Debug)]
pub struct SinkDispatcher {
    tx: Option<mpsc::Sender<PredictionRecord>>,
    worker: Option<JoinHandle<()>>,
}

impl SinkDispatcher {
    pub fn new(sink: Arc<dyn PredictionSink>) -> Self {
        let (tx, rx) = mpsc::channel::<PredictionRecord>();
        let worker = thread::spawn(move || {
            while let Ok(record) = rx.recv() {
                if let Err(e) = sink.record(&record) {
                    Logger::log(
                        Severity::Warn,
                        Event::SinkRecordFailed,
                        &[
                            ("identity", &record.identity),
                            ("model_version", &record.model_version),
                            ("reason", &e.to_string()),
                        ],
                    );
                }
            }
        });

        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Enqueues a record. Never blocks; if the worker is gone the
    /// record is dropped with a warning.
    pub fn dispatch(&self, record: PredictionRecord) {
        let Some(tx) = &self.tx else { return };
        if let Err(e) = tx.send(record) {
            Logger::log(
                Severity::Warn,
                Event::SinkRecordFailed,
                &[("reason", "dispatcher worker unavailable"), ("detail", &e.to_string())],
            );
        }
    }
}

impl Drop for SinkDispatcher {
    fn drop(&mut self) {
        // Closing the sender ends the worker loop once the queue is
        // drained; joining makes shutdown deterministic.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(identity: &str) -> PredictionRecord {
        PredictionRecord {
            identity: identity.to_string(),
            text: "win cash now".to_string(),
            label: Label::Spam,
            confidence: 0.91,
            model_version: "model-test".to_string(),
            recorded_at: Utc::now(),
        }
    }

    #[derive(Debug, Default)]
    struct FailingSink;

    impl PredictionSink for FailingSink {
        fn record(&self, _record: &PredictionRecord) -> Result<(), SinkError> {
            Err(SinkError::Unavailable("down for maintenance".to_string()))
        }
    }

    #[test]
    fn test_memory_sink_records() {
        let sink = MemorySink::new();
        sink.record(&record("user-1")).unwrap();
        sink.record(&record("user-2")).unwrap();
        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identity, "user-1");
    }

    #[test]
    fn test_dispatcher_delivers_to_sink() {
        let sink = Arc::new(MemorySink::new());
        {
            let dispatcher = SinkDispatcher::new(Arc::clone(&sink) as Arc<dyn PredictionSink>);
            dispatcher.dispatch(record("user-1"));
            dispatcher.dispatch(record("user-2"));
            // Drop joins the worker after the queue drains.
        }
        assert_eq!(sink.records().len(), 2);
    }

    #[test]
    fn test_dispatch_survives_failing_sink() {
        let dispatcher = SinkDispatcher::new(Arc::new(FailingSink));
        dispatcher.dispatch(record("user-1"));
        dispatcher.dispatch(record("user-2"));
        // No panic, no error surfaced; drop drains cleanly.
    }

    #[test]
    fn test_null_sink_accepts_everything() {
        assert!(NullSink.record(&record("anyone")).is_ok());
    }
}
