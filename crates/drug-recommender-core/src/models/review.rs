//! Review records and the in-memory corpus.

use serde::{Deserialize, Serialize};

use super::Condition;

/// A single user review from the dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    /// Drug the review is about
    pub drug_name: String,
    /// Condition the drug was taken for
    pub condition: Condition,
    /// Raw review text, markup and all
    pub text: String,
}

impl Review {
    /// Create a new review.
    pub fn new(drug_name: impl Into<String>, condition: Condition, text: impl Into<String>) -> Self {
        Self {
            drug_name: drug_name.into(),
            condition,
            text: text.into(),
        }
    }
}

/// A review together with its normalized text, computed once at load time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorpusEntry {
    pub review: Review,
    /// Output of the text normalizer for `review.text`
    pub normalized: String,
}

impl CorpusEntry {
    pub fn drug_name(&self) -> &str {
        &self.review.drug_name
    }

    pub fn condition(&self) -> Condition {
        self.review.condition
    }
}

/// Ordered, read-only collection of loaded reviews.
///
/// Entries keep dataset order; the per-condition partition is implicit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
}

impl Corpus {
    /// Build a corpus from already-normalized entries.
    pub fn new(entries: Vec<CorpusEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    /// Entries for one condition, in dataset order.
    pub fn subset(&self, condition: Condition) -> Vec<&CorpusEntry> {
        self.entries
            .iter()
            .filter(|e| e.condition() == condition)
            .collect()
    }

    /// Number of entries for one condition.
    pub fn count(&self, condition: Condition) -> usize {
        self.entries
            .iter()
            .filter(|e| e.condition() == condition)
            .count()
    }
}
