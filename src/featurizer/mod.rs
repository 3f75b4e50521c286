//! TF-IDF featurizer: deterministic text to fixed-length vector.
//!
//! The fitted struct is itself the persisted state: a term to column
//! index map plus the inverse document frequency per column. The
//! vocabulary is a `BTreeMap` so that serialization is byte
//! deterministic, which the artifact payload checksum relies on.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::text;

/// Default bound on the fitted vocabulary size.
pub const DEFAULT_MAX_VOCABULARY: usize = 5000;

/// A fitted TF-IDF vectorizer.
///
/// Fitting happens once, over the full training corpus; after that the
/// struct is read-only and may be shared freely across threads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TfIdfFeaturizer {
    /// Term to column index. Indices are assigned in lexicographic term
    /// order so refitting the same corpus reproduces the same state.
    vocabulary: BTreeMap<String, usize>,
    /// Smoothed inverse document frequency per column.
    idf: Vec<f64>,
    /// Number of documents the featurizer was fitted on.
    document_count: u64,
    /// The vocabulary bound the featurizer was fitted with.
    max_vocabulary: usize,
}

impl TfIdfFeaturizer {
    /// Fits a featurizer on normalized documents.
    ///
    /// When the corpus contains more than `max_vocabulary` distinct
    /// terms, the most frequent terms win, with lexicographic order as
    /// the tie-break so selection is deterministic.
    pub fn fit(documents: &[String], max_vocabulary: usize) -> Self {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| text::tokenize(d)).collect();

        // Corpus-wide term counts and per-term document frequency.
        let mut term_counts: HashMap<String, u64> = HashMap::new();
        let mut document_frequency: HashMap<String, u64> = HashMap::new();
        for tokens in &tokenized {
            let mut seen: Vec<&String> = Vec::new();
            for token in tokens {
                *term_counts.entry(token.clone()).or_insert(0) += 1;
                if !seen.contains(&token) {
                    seen.push(token);
                    *document_frequency.entry(token.clone()).or_insert(0) += 1;
                }
            }
        }

        // Keep the top `max_vocabulary` terms by corpus frequency.
        let mut ranked: Vec<(String, u64)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(max_vocabulary);

        // Column indices follow lexicographic term order.
        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();
        let vocabulary: BTreeMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term, index))
            .collect();

        let document_count = documents.len() as u64;
        let mut idf = vec![0.0; vocabulary.len()];
        for (term, &index) in &vocabulary {
            let df = document_frequency.get(term).copied().unwrap_or(0);
            idf[index] = smoothed_idf(document_count, df);
        }

        Self {
            vocabulary,
            idf,
            document_count,
            max_vocabulary,
        }
    }

    /// Transforms one normalized document into a TF-IDF vector.
    ///
    /// Out-of-vocabulary tokens are ignored; they contribute to the
    /// document length used for term-frequency normalization but never
    /// produce an error. An empty document maps to the zero vector.
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let tokens = text::tokenize(document);
        let mut features = vec![0.0; self.vocabulary.len()];

        for token in &tokens {
            if let Some(&index) = self.vocabulary.get(token) {
                features[index] += 1.0;
            }
        }

        let length = tokens.len() as f64;
        if length > 0.0 {
            for (index, value) in features.iter_mut().enumerate() {
                *value = (*value / length) * self.idf[index];
            }
        }

        features
    }

    /// Number of columns produced by [`transform`](Self::transform).
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of documents the featurizer was fitted on.
    pub fn document_count(&self) -> u64 {
        self.document_count
    }
}

/// Smoothed IDF: `ln((1 + n) / (1 + df)) + 1`.
///
/// The +1 smoothing keeps the weight finite for terms present in every
/// document and strictly positive for every in-vocabulary term.
fn smoothed_idf(documents: u64, document_frequency: u64) -> f64 {
    ((1.0 + documents as f64) / (1.0 + document_frequency as f64)).ln() + 1.0
}
