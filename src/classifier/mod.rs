//! Binary logistic regression over TF-IDF features.
//!
//! The fitted struct is the persisted state: one weight per feature
//! column plus a bias term, together with the hyperparameters that
//! produced them. Fitting is full-batch gradient descent with zero
//! initialization, so training the same data always yields the same
//! weights.

use serde::{Deserialize, Serialize};

/// Binary class label. Spam is the positive class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Ham,
    Spam,
}

impl Label {
    /// Wire encoding used by training data: spam=1, ham=0.
    pub fn from_binary(value: u8) -> Option<Self> {
        match value {
            0 => Some(Label::Ham),
            1 => Some(Label::Spam),
            _ => None,
        }
    }

    /// Regression target for this label.
    pub fn target(self) -> f64 {
        match self {
            Label::Ham => 0.0,
            Label::Spam => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Ham => "ham",
            Label::Spam => "spam",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fitted (or in-training) binary logistic regression model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogisticRegression {
    /// One coefficient per feature column.
    weights: Vec<f64>,
    /// Intercept term.
    bias: f64,
    /// Step size the model was fitted with.
    learning_rate: f64,
    /// Number of full-batch epochs the model was fitted with.
    epochs: u32,
}

impl LogisticRegression {
    /// Creates an unfitted model with zeroed parameters.
    ///
    /// An unfitted model answers 0.5 for every input; callers drive the
    /// epoch loop themselves via [`run_epoch`](Self::run_epoch) so they
    /// can interleave cancellation checks.
    pub fn new(feature_count: usize, learning_rate: f64, epochs: u32) -> Self {
        Self {
            weights: vec![0.0; feature_count],
            bias: 0.0,
            learning_rate,
            epochs,
        }
    }

    /// Fits a model on the given feature rows and targets.
    ///
    /// Convenience over [`new`](Self::new) plus the epoch loop, for
    /// callers that do not need cancellation.
    pub fn fit(features: &[Vec<f64>], targets: &[f64], learning_rate: f64, epochs: u32) -> Self {
        let feature_count = features.first().map_or(0, Vec::len);
        let mut model = Self::new(feature_count, learning_rate, epochs);
        for _ in 0..epochs {
            model.run_epoch(features, targets);
        }
        model
    }

    /// Runs one full-batch gradient descent epoch.
    ///
    /// Rows shorter than the weight vector are treated as zero-padded;
    /// rows longer are truncated. Both only arise on caller error, the
    /// training pipeline always feeds matching widths.
    pub fn run_epoch(&mut self, features: &[Vec<f64>], targets: &[f64]) {
        let samples = features.len().min(targets.len());
        if samples == 0 {
            return;
        }

        let mut weight_gradient = vec![0.0; self.weights.len()];
        let mut bias_gradient = 0.0;

        for (row, &target) in features.iter().zip(targets.iter()).take(samples) {
            let error = self.probability(row) - target;
            for (gradient, &value) in weight_gradient.iter_mut().zip(row.iter()) {
                *gradient += error * value;
            }
            bias_gradient += error;
        }

        let scale = self.learning_rate / samples as f64;
        for (weight, gradient) in self.weights.iter_mut().zip(weight_gradient.iter()) {
            *weight -= scale * gradient;
        }
        self.bias -= scale * bias_gradient;
    }

    /// Probability that the input belongs to the positive (spam) class.
    pub fn probability(&self, features: &[f64]) -> f64 {
        let mut z = self.bias;
        for (weight, value) in self.weights.iter().zip(features.iter()) {
            z += weight * value;
        }
        sigmoid(z)
    }

    /// Argmax decision: spam when the spam probability reaches 0.5.
    pub fn predict(&self, features: &[f64]) -> Label {
        if self.probability(features) >= 0.5 {
            Label::Spam
        } else {
            Label::Ham
        }
    }

    /// Number of feature columns the model expects.
    pub fn feature_count(&self) -> usize {
        self.weights.len()
    }

    /// Number of epochs the model was configured with.
    pub fn epochs(&self) -> u32 {
        self.epochs
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
