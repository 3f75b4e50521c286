//! Rule-based prediction rationale.
//!
//! Not a learned explanation: a fixed keyword layer over the input
//! text. Given the predicted label, only the keyword set associated
//! with that label is scanned, and the rationale reports which of its
//! keywords occur in the (case-folded) text. Same text and label always
//! yield the same explanation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::classifier::Label;

/// Keywords associated with the spam class.
pub const SPAM_KEYWORDS: &[&str] = &[
    "buy",
    "win",
    "free",
    "urgent",
    "click",
    "subscribe",
    "viagra",
    "lottery",
];

/// Keywords associated with the ham class. Disjoint from
/// [`SPAM_KEYWORDS`].
pub const HAM_KEYWORDS: &[&str] = &["meeting", "hello", "thanks", "schedule", "project"];

/// Human-readable rationale attached to a prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    /// Matched keywords, deduplicated and order-insensitive.
    pub keywords_found: BTreeSet<String>,
    /// Summary of the match count.
    pub reason: String,
}

/// Stateless rationale generator.
pub struct ExplanationEngine;

impl ExplanationEngine {
    /// Scans the text for substring occurrences of the keywords
    /// associated with the predicted label.
    ///
    /// The original (non-preprocessed) text is expected here; the scan
    /// case-folds internally so callers do not have to normalize first.
    pub fn explain(text: &str, predicted: Label) -> Explanation {
        let folded = text.to_lowercase();
        let keywords = match predicted {
            Label::Spam => SPAM_KEYWORDS,
            Label::Ham => HAM_KEYWORDS,
        };

        let keywords_found: BTreeSet<String> = keywords
            .iter()
            .filter(|keyword| folded.contains(*keyword))
            .map(|keyword| keyword.to_string())
            .collect();

        let reason = format!("Detected {} relevant keywords", keywords_found.len());
        Explanation {
            keywords_found,
            reason,
        }
    }
}
