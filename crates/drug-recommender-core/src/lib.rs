//! Drug Recommender Core Library
//!
//! Recommends drugs from a free-text user review by matching the review to a
//! condition and ranking that condition's drugs by review similarity.
//!
//! # Architecture
//!
//! ```text
//! startup:   CSV dataset → DatasetLoader → Corpus (normalized once, shared read-only)
//!
//! request:   review text
//!                │
//!                ▼
//!          TextNormalizer ──► ConditionMatcher ──► no match → NoConditionMatched
//!                                    │
//!                                    ▼
//!                       condition subset of Corpus
//!                                    │
//!                                    ▼
//!                 SimilarityRanker (fresh TF-IDF space per request)
//!                                    │
//!                                    ▼
//!                    ranked (drug, condition) pairs
//! ```
//!
//! # Modules
//!
//! - [`text`]: Review normalization (markup, punctuation, stopwords, lemmas)
//! - [`matcher`]: First-match-wins keyword condition detection
//! - [`similarity`]: TF-IDF vectorization and cosine ranking
//! - [`dataset`]: CSV loading and filtering into a [`Corpus`]
//! - [`config`]: JSON configuration
//! - [`models`]: Domain types (Condition, Review, Corpus, Recommendation)

pub mod config;
pub mod dataset;
pub mod matcher;
pub mod models;
pub mod similarity;
pub mod text;

// Re-export commonly used types
pub use config::{RecommenderConfig, ReferencePoint};
pub use dataset::{DatasetLoader, TextEncoding};
pub use matcher::{ConditionKeywords, ConditionMatcher};
pub use models::{Condition, Corpus, CorpusEntry, RankedDrug, Recommendation, Review};
pub use similarity::{SimilarityRanker, TfidfSpace, TfidfVectorizer};
pub use text::TextNormalizer;

use std::sync::Arc;

use tracing::debug;

// =========================================================================
// Error Type
// =========================================================================

#[derive(Debug, thiserror::Error)]
pub enum RecommenderError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Dataset error: {0}")]
    Dataset(#[from] dataset::DatasetError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Ranking error: {0}")]
    Similarity(#[from] similarity::SimilarityError),
}

pub type RecommenderResult<T> = Result<T, RecommenderError>;

// =========================================================================
// Main API Object
// =========================================================================

/// Review-to-drug recommendation pipeline.
///
/// The corpus is shared read-only; every request builds its own TF-IDF space.
pub struct Recommender {
    corpus: Arc<Corpus>,
    normalizer: TextNormalizer,
    matcher: ConditionMatcher,
    ranker: SimilarityRanker,
    top_n: usize,
    reference: ReferencePoint,
    max_review_chars: usize,
}

impl Recommender {
    /// Create a recommender over an already-loaded corpus.
    pub fn new(corpus: Arc<Corpus>, config: &RecommenderConfig) -> Self {
        Self::with_normalizer(corpus, TextNormalizer::new(), config)
    }

    /// Create a recommender with a customized normalizer.
    ///
    /// Use the same normalizer the corpus was loaded with.
    pub fn with_normalizer(
        corpus: Arc<Corpus>,
        normalizer: TextNormalizer,
        config: &RecommenderConfig,
    ) -> Self {
        let (min_n, max_n) = config.ngram_range;
        let vectorizer = TfidfVectorizer::new()
            .with_max_features(config.max_features)
            .with_ngram_range(min_n, max_n);

        Self {
            corpus,
            normalizer,
            matcher: ConditionMatcher::new(&config.conditions),
            ranker: SimilarityRanker::new(vectorizer),
            top_n: config.top_n,
            reference: config.reference,
            max_review_chars: config.max_review_chars,
        }
    }

    /// Validate the config, load its dataset and build a recommender.
    pub fn from_config(config: &RecommenderConfig) -> RecommenderResult<Self> {
        config.validate()?;

        let normalizer = TextNormalizer::new();
        let matcher = ConditionMatcher::new(&config.conditions);
        let corpus = DatasetLoader::new(&normalizer)
            .with_conditions(&matcher.conditions())
            .with_encoding(config.encoding)
            .load(&config.dataset_path)?;

        Ok(Self::with_normalizer(Arc::new(corpus), normalizer, config))
    }

    /// Recommend up to the configured number of drugs for a review.
    pub fn recommend(&self, review: &str) -> RecommenderResult<Recommendation> {
        self.recommend_top(review, self.top_n)
    }

    /// Recommend from raw bytes; invalid UTF-8 is malformed input.
    pub fn recommend_bytes(&self, review: &[u8]) -> RecommenderResult<Recommendation> {
        let review = std::str::from_utf8(review).map_err(|e| {
            RecommenderError::MalformedInput(format!("review is not valid UTF-8: {}", e))
        })?;
        self.recommend(review)
    }

    /// Recommend up to `top_n` drugs for a review.
    pub fn recommend_top(&self, review: &str, top_n: usize) -> RecommenderResult<Recommendation> {
        self.check_input(review)?;

        let normalized = self.normalizer.normalize(review);
        let Some(condition) = self.matcher.match_condition(&normalized) else {
            debug!("no condition keyword in review");
            return Ok(Recommendation::NoConditionMatched);
        };

        let subset = self.corpus.subset(condition);
        debug!(%condition, reviews = subset.len(), "matched condition");

        let drugs = match self.reference {
            ReferencePoint::LastReview => {
                let reference_index = subset.len().saturating_sub(1);
                self.ranker.rank(condition, reference_index, &subset, top_n)?
            }
            ReferencePoint::Query => {
                self.ranker.rank_against(condition, &normalized, &subset, top_n)?
            }
        };

        Ok(Recommendation::Ranked { condition, drugs })
    }

    /// The shared corpus.
    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    /// Get the normalizer for direct access.
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Get the condition matcher for direct access.
    pub fn matcher(&self) -> &ConditionMatcher {
        &self.matcher
    }

    fn check_input(&self, review: &str) -> RecommenderResult<()> {
        if review.contains('\0') {
            return Err(RecommenderError::MalformedInput(
                "review contains a NUL character".into(),
            ));
        }

        let chars = review.chars().count();
        if chars > self.max_review_chars {
            return Err(RecommenderError::MalformedInput(format!(
                "review is {} characters, limit is {}",
                chars, self.max_review_chars
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(drug: &str, condition: Condition, text: &str) -> CorpusEntry {
        let normalizer = TextNormalizer::new();
        CorpusEntry {
            normalized: normalizer.normalize(text),
            review: Review::new(drug, condition, text),
        }
    }

    fn sample_corpus() -> Arc<Corpus> {
        Arc::new(Corpus::new(vec![
            entry("Sertraline", Condition::Depression, "Helped my depression a lot"),
            entry("Lisinopril", Condition::HighBloodPressure, "Blood pressure down, dry cough"),
            entry("Bupropion", Condition::Depression, "Energy is back, mood swings gone"),
            entry("Metformin", Condition::DiabetesType2, "Diarrhea and gas the first week"),
            entry("Fluoxetine", Condition::Depression, "Mood swings are gone, energy back"),
        ]))
    }

    #[test]
    fn test_recommend_depression() {
        let recommender = Recommender::new(sample_corpus(), &RecommenderConfig::default());

        let rec = recommender
            .recommend("I feel very depressed and my mood swings a lot")
            .unwrap();

        assert_eq!(rec.condition(), Some(Condition::Depression));
        // Three Depression reviews, minus the reference row
        assert_eq!(rec.drugs().len(), 2);
        assert_eq!(rec.drugs()[0].drug_name, "Bupropion");
        assert!(rec.drugs().iter().all(|d| d.drug_name != "Fluoxetine"));
    }

    #[test]
    fn test_no_condition_matched() {
        let recommender = Recommender::new(sample_corpus(), &RecommenderConfig::default());

        let rec = recommender.recommend("nothing relevant here").unwrap();
        assert_eq!(rec, Recommendation::NoConditionMatched);

        let empty = recommender.recommend("").unwrap();
        assert_eq!(empty, Recommendation::NoConditionMatched);
    }

    #[test]
    fn test_single_review_condition() {
        let recommender = Recommender::new(sample_corpus(), &RecommenderConfig::default());

        let rec = recommender.recommend("my hypertension is bad").unwrap();
        assert_eq!(rec.condition(), Some(Condition::HighBloodPressure));
        assert!(rec.is_empty());
    }

    #[test]
    fn test_condition_without_reviews() {
        let corpus = Arc::new(Corpus::new(vec![entry(
            "Sertraline",
            Condition::Depression,
            "depression",
        )]));
        let recommender = Recommender::new(corpus, &RecommenderConfig::default());

        let rec = recommender.recommend("recently diagnosed").unwrap();
        assert_eq!(
            rec,
            Recommendation::Ranked {
                condition: Condition::DiabetesType2,
                drugs: vec![]
            }
        );
    }

    #[test]
    fn test_query_reference_mode() {
        let config = RecommenderConfig {
            reference: ReferencePoint::Query,
            ..RecommenderConfig::default()
        };
        let recommender = Recommender::new(sample_corpus(), &config);

        let rec = recommender.recommend("depression helped a lot").unwrap();

        // Every Depression review is a candidate; the closest is Sertraline
        assert_eq!(rec.drugs().len(), 3);
        assert_eq!(rec.drugs()[0].drug_name, "Sertraline");
    }

    #[test]
    fn test_top_n_override() {
        let recommender = Recommender::new(sample_corpus(), &RecommenderConfig::default());

        let rec = recommender.recommend_top("depression", 1).unwrap();
        assert_eq!(rec.drugs().len(), 1);
    }

    #[test]
    fn test_malformed_input() {
        let config = RecommenderConfig {
            max_review_chars: 10,
            ..RecommenderConfig::default()
        };
        let recommender = Recommender::new(sample_corpus(), &config);

        assert!(matches!(
            recommender.recommend("depression and then some more words"),
            Err(RecommenderError::MalformedInput(_))
        ));
        assert!(matches!(
            recommender.recommend("dep\0"),
            Err(RecommenderError::MalformedInput(_))
        ));
        assert!(matches!(
            recommender.recommend_bytes(&[0x64, 0xFF, 0x65]),
            Err(RecommenderError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_recommend_bytes_valid() {
        let recommender = Recommender::new(sample_corpus(), &RecommenderConfig::default());

        let rec = recommender.recommend_bytes(b"depression").unwrap();
        assert_eq!(rec.condition(), Some(Condition::Depression));
    }

    #[test]
    fn test_from_config_missing_dataset() {
        let config = RecommenderConfig {
            dataset_path: "/nonexistent/reviews.csv".into(),
            ..RecommenderConfig::default()
        };

        assert!(matches!(
            Recommender::from_config(&config),
            Err(RecommenderError::Dataset(_))
        ));
    }

    #[test]
    fn test_from_config_invalid() {
        let config = RecommenderConfig {
            top_n: 0,
            ..RecommenderConfig::default()
        };

        assert!(matches!(
            Recommender::from_config(&config),
            Err(RecommenderError::Config(_))
        ));
    }
}
