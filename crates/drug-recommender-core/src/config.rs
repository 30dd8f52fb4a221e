//! Recommender configuration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::TextEncoding;
use crate::matcher::{default_keyword_table, ConditionKeywords};
use crate::similarity::{DEFAULT_MAX_FEATURES, DEFAULT_NGRAM_RANGE};

/// Default number of drugs returned per request.
pub const DEFAULT_TOP_N: usize = 5;

/// Longest review accepted, in characters.
pub const DEFAULT_MAX_REVIEW_CHARS: usize = 100_000;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which row the ranking compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePoint {
    /// Last review of the matched condition's subset
    #[default]
    LastReview,
    /// The incoming review, appended as the final row
    Query,
}

/// Settings for loading the dataset and serving recommendations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecommenderConfig {
    pub dataset_path: PathBuf,
    pub encoding: TextEncoding,
    pub top_n: usize,
    pub max_features: usize,
    /// Inclusive `[min_n, max_n]` n-gram lengths
    pub ngram_range: (usize, usize),
    pub max_review_chars: usize,
    pub reference: ReferencePoint,
    /// Condition keywords in priority order
    pub conditions: Vec<ConditionKeywords>,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("drugsCom_raw.csv"),
            encoding: TextEncoding::default(),
            top_n: DEFAULT_TOP_N,
            max_features: DEFAULT_MAX_FEATURES,
            ngram_range: DEFAULT_NGRAM_RANGE,
            max_review_chars: DEFAULT_MAX_REVIEW_CHARS,
            reference: ReferencePoint::default(),
            conditions: default_keyword_table(),
        }
    }
}

impl RecommenderConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check value ranges and the keyword table.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be positive".into()));
        }
        if self.max_features == 0 {
            return Err(ConfigError::Invalid("max_features must be positive".into()));
        }
        if self.max_review_chars == 0 {
            return Err(ConfigError::Invalid("max_review_chars must be positive".into()));
        }

        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ConfigError::Invalid(format!(
                "ngram_range must satisfy 1 <= min <= max, got ({}, {})",
                min_n, max_n
            )));
        }

        if self.conditions.is_empty() {
            return Err(ConfigError::Invalid("at least one condition is required".into()));
        }

        let mut seen = HashSet::new();
        for entry in &self.conditions {
            if !seen.insert(entry.condition) {
                return Err(ConfigError::Invalid(format!(
                    "condition listed twice: {}",
                    entry.condition
                )));
            }
            if entry.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "condition {} has no keywords",
                    entry.condition
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Condition;

    #[test]
    fn test_defaults() {
        let config = RecommenderConfig::default();

        assert_eq!(config.top_n, 5);
        assert_eq!(config.max_features, 1000);
        assert_eq!(config.ngram_range, (1, 3));
        assert_eq!(config.reference, ReferencePoint::LastReview);
        assert_eq!(config.encoding, TextEncoding::Latin1);
        assert_eq!(config.conditions.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RecommenderConfig::from_json_str(
            r#"{"dataset_path": "reviews.csv", "top_n": 10, "reference": "query"}"#,
        )
        .unwrap();

        assert_eq!(config.dataset_path, PathBuf::from("reviews.csv"));
        assert_eq!(config.top_n, 10);
        assert_eq!(config.reference, ReferencePoint::Query);
        assert_eq!(config.max_features, 1000);
    }

    #[test]
    fn test_custom_conditions() {
        let config = RecommenderConfig::from_json_str(
            r#"{
                "encoding": "utf8",
                "ngram_range": [1, 2],
                "conditions": [
                    {"condition": "High Blood Pressure", "keywords": ["hypertension"]},
                    {"condition": "Depression", "keywords": ["depression"]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.encoding, TextEncoding::Utf8);
        assert_eq!(config.ngram_range, (1, 2));
        assert_eq!(config.conditions[0].condition, Condition::HighBloodPressure);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            RecommenderConfig::from_json_str(r#"{"top_n": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RecommenderConfig::from_json_str(r#"{"ngram_range": [3, 1]}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RecommenderConfig::from_json_str(r#"{"max_features": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RecommenderConfig::from_json_str(r#"{"conditions": []}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_condition() {
        let json = r#"{"conditions": [
            {"condition": "Depression", "keywords": ["a"]},
            {"condition": "Depression", "keywords": ["b"]}
        ]}"#;
        assert!(matches!(
            RecommenderConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_condition() {
        let json = r#"{"conditions": [{"condition": "Acne", "keywords": ["skin"]}]}"#;
        assert!(matches!(
            RecommenderConfig::from_json_str(json),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"top_n": 3}"#).unwrap();

        let config = RecommenderConfig::from_json_file(&path).unwrap();
        assert_eq!(config.top_n, 3);

        let missing = RecommenderConfig::from_json_file(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
