//! Training Invariant Tests
//!
//! - Degenerate training sets are rejected before any fitting work
//! - A successful run persists a new immutable artifact and then swaps
//!   the active pointer (write-then-swap)
//! - Cancellation persists nothing and leaves the pointer untouched
//! - Bootstrap happens exactly once per empty registry

use sieved::{
    CancelToken, Engine, EngineConfig, Label, TrainingError, TrainingExample, TrainingOptions,
};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn open_engine(dir: &TempDir) -> Engine {
    Engine::open(EngineConfig::with_models_dir(dir.path())).expect("engine open")
}

fn balanced_examples() -> Vec<TrainingExample> {
    vec![
        TrainingExample::new("Win lottery now!!!", Label::Spam),
        TrainingExample::new("free viagra click here", Label::Spam),
        TrainingExample::new("Meeting at 3pm", Label::Ham),
        TrainingExample::new("project schedule attached", Label::Ham),
    ]
}

// =============================================================================
// Insufficient data policy
// =============================================================================

#[test]
fn test_empty_training_set_rejected() {
    let dir = TempDir::new().unwrap();
    let engine = open_engine(&dir);
    let result = engine.train(&[]);
    assert!(matches!(result, Err(TrainingError::InsufficientData(_))));
}

#[test]
fn test_single_class_training_set_rejected() {
    let dir = TempDir::new().unwrap();
    let engine = open_engine(&dir);

    let spam_only = vec![
        TrainingExample::new("win cash", Label::Spam),
        TrainingExample::new("free lottery", Label::Spam),
    ];
    assert!(matches!(
        engine.train(&spam_only),
        Err(TrainingError::InsufficientData(_))
    ));

    let ham_only = vec![TrainingExample::new("meeting at noon", Label::Ham)];
    assert!(matches!(
        engine.train(&ham_only),
        Err(TrainingError::InsufficientData(_))
    ));
}

#[test]
fn test_rejected_training_does_not_touch_registry_or_pointer() {
    let dir = TempDir::new().unwrap();
    let engine = open_engine(&dir);
    let before_active = engine.active_version();
    let before_count = engine.list_models().unwrap().len();

    let _ = engine.train(&[]);

    assert_eq!(engine.active_version(), before_active);
    assert_eq!(engine.list_models().unwrap().len(), before_count);
}

// =============================================================================
// Successful run
// =============================================================================

#[test]
fn test_training_produces_new_artifact_and_activates_it() {
    let dir = TempDir::new().unwrap();
    let engine = open_engine(&dir);
    let before_active = engine.active_version();

    let report = engine.train(&balanced_examples()).unwrap();
    assert_ne!(report.artifact_id, before_active);
    assert_eq!(report.training_sample_count, 4);
    assert_eq!(engine.active_version(), report.artifact_id);

    let listing = engine.list_models().unwrap();
    assert_eq!(listing[0].id, report.artifact_id);
}

#[test]
fn test_metrics_are_bounded_and_clean_on_separable_data() {
    let dir = TempDir::new().unwrap();
    let engine = open_engine(&dir);
    let report = engine.train(&balanced_examples()).unwrap();

    for metric in [
        report.metrics.accuracy,
        report.metrics.precision,
        report.metrics.recall,
        report.metrics.f1,
    ] {
        assert!((0.0..=1.0).contains(&metric));
    }
    assert_eq!(report.metrics.accuracy, 1.0);
}

#[test]
fn test_retraining_never_mutates_previous_artifacts() {
    let dir = TempDir::new().unwrap();
    let engine = open_engine(&dir);
    let first = engine.train(&balanced_examples()).unwrap();
    let first_summary = engine
        .list_models()
        .unwrap()
        .into_iter()
        .find(|s| s.id == first.artifact_id)
        .unwrap();

    engine.train(&balanced_examples()).unwrap();

    let unchanged = engine
        .list_models()
        .unwrap()
        .into_iter()
        .find(|s| s.id == first.artifact_id)
        .unwrap();
    assert_eq!(first_summary, unchanged);
}

#[test]
fn test_training_label_shows_up_in_listing() {
    let dir = TempDir::new().unwrap();
    let engine = open_engine(&dir);
    let options = TrainingOptions {
        label: Some("weekly-refresh".to_string()),
        cancel: None,
    };
    let report = engine
        .train_with_options(&balanced_examples(), &options)
        .unwrap();

    let listing = engine.list_models().unwrap();
    let entry = listing.iter().find(|s| s.id == report.artifact_id).unwrap();
    assert_eq!(entry.label.as_deref(), Some("weekly-refresh"));
}

// =============================================================================
// Cancellation
// =============================================================================

#[test]
fn test_cancelled_training_persists_nothing() {
    let dir = TempDir::new().unwrap();
    let engine = open_engine(&dir);
    let before_active = engine.active_version();
    let before_count = engine.list_models().unwrap().len();

    let cancel = CancelToken::new();
    cancel.cancel();
    let options = TrainingOptions {
        label: None,
        cancel: Some(cancel),
    };
    let result = engine.train_with_options(&balanced_examples(), &options);
    assert!(matches!(result, Err(TrainingError::Cancelled)));

    assert_eq!(engine.active_version(), before_active);
    assert_eq!(engine.list_models().unwrap().len(), before_count);
}

// =============================================================================
// Bootstrap
// =============================================================================

#[test]
fn test_bootstrap_persists_exactly_one_artifact() {
    let dir = TempDir::new().unwrap();
    let engine = open_engine(&dir);
    let listing = engine.list_models().unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].label.as_deref(), Some("default"));
    assert_eq!(listing[0].training_sample_count, 6);
}

#[test]
fn test_reopen_does_not_bootstrap_again() {
    let dir = TempDir::new().unwrap();
    let first_version = {
        let engine = open_engine(&dir);
        engine.active_version()
    };

    let engine = open_engine(&dir);
    assert_eq!(engine.list_models().unwrap().len(), 1);
    assert_eq!(engine.active_version(), first_version);
}
