//! Text normalization and tokenization shared by training and inference.
//!
//! Featurizer state assumes the exact same normalization was applied at
//! fit time and at transform time, so both pipelines must go through
//! this module. Any change here invalidates every persisted artifact.

/// Minimum token length kept by [`tokenize`]. Single characters carry
/// almost no signal for term weighting and inflate the vocabulary.
pub const MIN_TOKEN_LEN: usize = 2;

/// Case-folds the input and collapses runs of whitespace to single
/// spaces.
///
/// Returns an empty string for input that is empty or all whitespace.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits normalized text into alphanumeric tokens of at least
/// [`MIN_TOKEN_LEN`] characters.
///
/// Callers are expected to pass text that already went through
/// [`normalize`]; tokens are not case-folded here.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= MIN_TOKEN_LEN)
        .map(|token| token.to_string())
        .collect()
}
