//! Drug ranking by review similarity.
//!
//! Each request builds a fresh TF-IDF space over one condition's reviews,
//! scores every review against a reference row, and returns the drugs of the
//! closest reviews.

use std::cmp::Ordering;

use tracing::debug;

use crate::models::{Condition, CorpusEntry, RankedDrug};

use super::{SimilarityError, SimilarityResult, TfidfVectorizer};

/// Ranks a condition's reviews against a reference review.
pub struct SimilarityRanker {
    vectorizer: TfidfVectorizer,
}

impl Default for SimilarityRanker {
    fn default() -> Self {
        Self::new(TfidfVectorizer::new())
    }
}

impl SimilarityRanker {
    /// Create a ranker using the given vectorizer settings.
    pub fn new(vectorizer: TfidfVectorizer) -> Self {
        Self { vectorizer }
    }

    /// Rank `subset` against its row `reference_index`.
    ///
    /// Returns up to `top_n` drugs, most similar first, never including the
    /// reference row itself. Short or empty subsets give short or empty results.
    pub fn rank(
        &self,
        condition: Condition,
        reference_index: usize,
        subset: &[&CorpusEntry],
        top_n: usize,
    ) -> SimilarityResult<Vec<RankedDrug>> {
        let documents: Vec<&str> = subset.iter().map(|e| e.normalized.as_str()).collect();
        let ranked = self.rank_documents(&documents, reference_index, top_n)?;

        Ok(to_ranked_drugs(condition, subset, ranked))
    }

    /// Rank `subset` against an outside text appended as the final row.
    pub fn rank_against(
        &self,
        condition: Condition,
        query_normalized: &str,
        subset: &[&CorpusEntry],
        top_n: usize,
    ) -> SimilarityResult<Vec<RankedDrug>> {
        if subset.is_empty() {
            return Ok(Vec::new());
        }

        let mut documents: Vec<&str> = subset.iter().map(|e| e.normalized.as_str()).collect();
        documents.push(query_normalized);
        let reference_index = documents.len() - 1;

        let ranked = self.rank_documents(&documents, reference_index, top_n)?;
        Ok(to_ranked_drugs(condition, subset, ranked))
    }

    /// Rank document indices by cosine similarity to `reference_index`.
    ///
    /// Returns `(index, score)` pairs. Equal scores keep document order.
    pub fn rank_documents(
        &self,
        documents: &[&str],
        reference_index: usize,
        top_n: usize,
    ) -> SimilarityResult<Vec<(usize, f64)>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        if reference_index >= documents.len() {
            return Err(SimilarityError::ReferenceOutOfRange {
                index: reference_index,
                len: documents.len(),
            });
        }

        let space = self.vectorizer.fit_transform(documents);
        debug!(
            rows = space.n_rows(),
            features = space.vocabulary().len(),
            "built tfidf space"
        );

        let scores = space
            .similarity_row(reference_index)
            .ok_or(SimilarityError::ReferenceOutOfRange {
                index: reference_index,
                len: documents.len(),
            })?;

        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));

        // The reference row is the self-similarity entry; it is never a result
        Ok(order
            .into_iter()
            .filter(|&i| i != reference_index)
            .take(top_n)
            .map(|i| (i, scores[i]))
            .collect())
    }
}

/// Map ranked row indices back to drugs. Indices past the subset are dropped.
fn to_ranked_drugs(
    condition: Condition,
    subset: &[&CorpusEntry],
    ranked: Vec<(usize, f64)>,
) -> Vec<RankedDrug> {
    ranked
        .into_iter()
        .filter_map(|(i, score)| {
            subset.get(i).map(|entry| RankedDrug {
                drug_name: entry.drug_name().to_string(),
                condition,
                score,
            })
        })
        .collect()
}
