//! Supported medical conditions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A medical condition the recommender knows how to serve.
///
/// Serialized by its dataset label (e.g. `"High Blood Pressure"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "Depression")]
    Depression,
    #[serde(rename = "High Blood Pressure")]
    HighBloodPressure,
    #[serde(rename = "Diabetes, Type 2")]
    DiabetesType2,
}

impl Condition {
    /// All supported conditions, in default priority order.
    pub const ALL: [Condition; 3] = [
        Condition::Depression,
        Condition::HighBloodPressure,
        Condition::DiabetesType2,
    ];

    /// Label as it appears in the dataset's `condition` column.
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Depression => "Depression",
            Condition::HighBloodPressure => "High Blood Pressure",
            Condition::DiabetesType2 => "Diabetes, Type 2",
        }
    }

    /// Look up a condition by its exact dataset label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("Unsupported condition: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        for condition in Condition::ALL {
            assert_eq!(Condition::from_label(condition.label()), Some(condition));
        }
    }

    #[test]
    fn test_label_is_exact() {
        // Dataset labels are compared exactly
        assert_eq!(Condition::from_label("depression"), None);
        assert_eq!(Condition::from_label("Diabetes Type 2"), None);
        assert_eq!(Condition::from_label(" Depression"), None);
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Condition::DiabetesType2).unwrap();
        assert_eq!(json, "\"Diabetes, Type 2\"");

        let parsed: Condition = serde_json::from_str("\"High Blood Pressure\"").unwrap();
        assert_eq!(parsed, Condition::HighBloodPressure);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("Acne".parse::<Condition>().is_err());
        assert_eq!("Depression".parse::<Condition>(), Ok(Condition::Depression));
    }
}
