//! Ranking output models.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Condition;

/// One recommended drug with its similarity to the reference review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedDrug {
    pub drug_name: String,
    pub condition: Condition,
    /// Cosine similarity to the reference row (0.0 - 1.0)
    pub score: f64,
}

impl fmt::Display for RankedDrug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (for {})", self.drug_name, self.condition)
    }
}

/// Result of a recommendation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Recommendation {
    /// The review mentioned none of the configured condition keywords
    NoConditionMatched,
    /// Drugs ranked for the matched condition; may be short or empty
    Ranked {
        condition: Condition,
        drugs: Vec<RankedDrug>,
    },
}

impl Recommendation {
    /// Ranked drugs, most similar first.
    pub fn drugs(&self) -> &[RankedDrug] {
        match self {
            Recommendation::NoConditionMatched => &[],
            Recommendation::Ranked { drugs, .. } => drugs,
        }
    }

    /// Matched condition, if any.
    pub fn condition(&self) -> Option<Condition> {
        match self {
            Recommendation::NoConditionMatched => None,
            Recommendation::Ranked { condition, .. } => Some(*condition),
        }
    }

    /// Ordered `(drug_name, condition_label)` pairs.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.drugs()
            .iter()
            .map(|d| (d.drug_name.clone(), d.condition.label().to_string()))
            .collect()
    }

    /// True when there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.drugs().is_empty()
    }
}
