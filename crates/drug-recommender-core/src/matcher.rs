//! Keyword-based condition detection.
//!
//! Conditions are tried in table order and keywords in list order; the first
//! keyword found as a substring decides the condition.

use serde::{Deserialize, Serialize};

use crate::models::Condition;

/// Trigger keywords for one condition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConditionKeywords {
    pub condition: Condition,
    /// Matched case-insensitively as substrings, in this order
    pub keywords: Vec<String>,
}

/// Ordered condition → keywords table. Earlier entries win.
pub fn default_keyword_table() -> Vec<ConditionKeywords> {
    vec![
        ConditionKeywords {
            condition: Condition::Depression,
            keywords: vec!["Depression".into(), "antidepressant".into(), "mood swing".into()],
        },
        ConditionKeywords {
            condition: Condition::HighBloodPressure,
            keywords: vec![
                "High Blood Pressure".into(),
                "blood pressure".into(),
                "hypertension".into(),
            ],
        },
        ConditionKeywords {
            condition: Condition::DiabetesType2,
            keywords: vec![
                "Diabetes, Type 2".into(),
                "diarrhea gas".into(),
                "diagnosed".into(),
            ],
        },
    ]
}

/// First-match-wins condition matcher.
pub struct ConditionMatcher {
    /// (condition, lower-cased keywords) in priority order
    table: Vec<(Condition, Vec<String>)>,
}

impl Default for ConditionMatcher {
    fn default() -> Self {
        Self::new(&default_keyword_table())
    }
}

impl ConditionMatcher {
    /// Create a matcher from an ordered keyword table.
    pub fn new(table: &[ConditionKeywords]) -> Self {
        let table = table
            .iter()
            .map(|entry| {
                let keywords = entry
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (entry.condition, keywords)
            })
            .collect();

        Self { table }
    }

    /// Find the first condition whose keyword appears in the normalized text.
    pub fn match_condition(&self, normalized: &str) -> Option<Condition> {
        let text = normalized.to_lowercase();

        self.table
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k.as_str())))
            .map(|(condition, _)| *condition)
    }

    /// Conditions in priority order.
    pub fn conditions(&self) -> Vec<Condition> {
        self.table.iter().map(|(c, _)| *c).collect()
    }
}
