//! TF-IDF vectorization over a small document set.
//!
//! - Tokens: runs of two or more word characters, lower-cased
//! - Features: word n-grams over the token sequence (default 1..=3)
//! - Vocabulary: capped at `max_features`, keeping the terms with the highest
//!   total count across all documents
//! - Weights: raw count × smoothed IDF `ln((1 + n) / (1 + df)) + 1`, rows L2-normalized

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Default vocabulary cap.
pub const DEFAULT_MAX_FEATURES: usize = 1000;

/// Default n-gram range (unigrams through trigrams).
pub const DEFAULT_NGRAM_RANGE: (usize, usize) = (1, 3);

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// Sparse, L2-normalized row vector. Entries are sorted by feature index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_weights(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|(idx, _)| *idx);

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }

        Self { entries }
    }

    /// Non-zero (feature index, weight) pairs.
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// True for a document with no in-vocabulary terms.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product of two sorted sparse vectors.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;

        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }

        sum
    }

    /// Cosine similarity. Rows are unit length, so this is the dot product;
    /// a zero row is dissimilar to everything, itself included.
    pub fn cosine(&self, other: &SparseVector) -> f64 {
        if self.is_zero() || other.is_zero() {
            return 0.0;
        }
        self.dot(other)
    }
}

/// Builds a [`TfidfSpace`] from documents.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
    ngram_range: (usize, usize),
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfidfVectorizer {
    /// Create a vectorizer with the default cap and n-gram range.
    pub fn new() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            ngram_range: DEFAULT_NGRAM_RANGE,
        }
    }

    /// Set the vocabulary cap.
    ///
    /// Clamped to at least 1. `RecommenderConfig::validate` rejects 0 before
    /// a configured value gets here.
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features.max(1);
        self
    }

    /// Set the n-gram range (inclusive).
    ///
    /// `min_n` is clamped to at least 1 and `max_n` to at least `min_n`, so a
    /// reversed range collapses to `(min_n, min_n)`. `RecommenderConfig::validate`
    /// rejects both cases for configured values.
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        let min_n = min_n.max(1);
        self.ngram_range = (min_n, max_n.max(min_n));
        self
    }

    pub fn max_features(&self) -> usize {
        self.max_features
    }

    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    /// Learn the vocabulary and IDF weights from `documents` and vectorize them.
    ///
    /// Row `i` of the result corresponds to `documents[i]`.
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> TfidfSpace {
        let doc_counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| self.count_terms(doc.as_ref()))
            .collect();

        let mut total_counts: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for counts in &doc_counts {
            for (term, count) in counts {
                *total_counts.entry(term.as_str()).or_insert(0) += count;
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        // Highest total count first; ties by term so the cut is deterministic
        let mut ranked: Vec<(&str, usize)> = total_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);

        let mut vocabulary: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
        vocabulary.sort();

        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let n_docs = documents.len() as f64;
        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|term| {
                let df = doc_freq.get(term.as_str()).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let rows = doc_counts
            .iter()
            .map(|counts| {
                let weights = counts
                    .iter()
                    .filter_map(|(term, count)| {
                        index
                            .get(term.as_str())
                            .map(|&i| (i, *count as f64 * idf[i]))
                    })
                    .collect();
                SparseVector::from_weights(weights)
            })
            .collect();

        TfidfSpace {
            vocabulary,
            idf,
            rows,
        }
    }

    /// Count every n-gram in one document.
    fn count_terms(&self, document: &str) -> HashMap<String, usize> {
        let lowered = document.to_lowercase();
        let tokens: Vec<&str> = TOKEN_RE.find_iter(&lowered).map(|m| m.as_str()).collect();

        let mut counts = HashMap::new();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                *counts.entry(window.join(" ")).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Request-scoped TF-IDF matrix: one row per document.
#[derive(Debug, Clone)]
pub struct TfidfSpace {
    /// Feature index → term, lexicographic
    vocabulary: Vec<String>,
    /// Feature index → IDF weight
    idf: Vec<f64>,
    rows: Vec<SparseVector>,
}

impl TfidfSpace {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn row(&self, index: usize) -> Option<&SparseVector> {
        self.rows.get(index)
    }

    /// IDF weight of a vocabulary term.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary
            .binary_search_by(|t| t.as_str().cmp(term))
            .ok()
            .map(|i| self.idf[i])
    }

    /// Cosine similarity of row `index` against every row.
    pub fn similarity_row(&self, index: usize) -> Option<Vec<f64>> {
        let reference = self.rows.get(index)?;
        Some(self.rows.iter().map(|row| reference.cosine(row)).collect())
    }

    /// Full pairwise cosine similarity matrix.
    pub fn similarity_matrix(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|a| self.rows.iter().map(|b| a.cosine(b)).collect())
            .collect()
    }
}
