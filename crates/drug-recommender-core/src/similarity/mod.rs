//! TF-IDF similarity ranking.
//!
//! Pipeline: condition subset → TF-IDF space → cosine row → ranked drugs

mod ranker;
mod tfidf;

pub use ranker::*;
pub use tfidf::*;

use thiserror::Error;

/// Similarity ranking errors.
#[derive(Error, Debug)]
pub enum SimilarityError {
    #[error("Reference row {index} out of range for {len} reviews")]
    ReferenceOutOfRange { index: usize, len: usize },
}

pub type SimilarityResult<T> = Result<T, SimilarityError>;
