//! Review dataset loading.
//!
//! Reads a CSV export with at least `drugName`, `condition` and `review`
//! columns, drops incomplete rows and unsupported conditions, and normalizes
//! every kept review up front.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Condition, Corpus, CorpusEntry, Review};
use crate::text::TextNormalizer;

pub const DRUG_NAME_COLUMN: &str = "drugName";
pub const CONDITION_COLUMN: &str = "condition";
pub const REVIEW_COLUMN: &str = "review";

/// Field values treated as missing, matching common tabular NA markers.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Dataset errors. All of them are fatal at startup.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Invalid UTF-8 in column {column} at line {line}")]
    InvalidEncoding { column: String, line: u64 },

    #[error("Expected {expected} fields at line {line}, found {found}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },
}

pub type DatasetResult<T> = Result<T, DatasetError>;

/// Character encoding of the dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// Every byte maps to the code point of the same value; never fails
    #[default]
    Latin1,
    /// Strict UTF-8; invalid bytes fail the load
    Utf8,
}

impl TextEncoding {
    fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
        }
    }
}

/// Counters from one load, for the startup log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows_read: usize,
    pub missing_fields: usize,
    pub unsupported_condition: usize,
    pub retained: usize,
}

/// Column positions of the required fields.
struct ColumnIndex {
    drug_name: usize,
    condition: usize,
    review: usize,
}

/// Loader that turns a raw review export into a [`Corpus`].
pub struct DatasetLoader<'a> {
    normalizer: &'a TextNormalizer,
    conditions: Vec<Condition>,
    encoding: TextEncoding,
}

impl<'a> DatasetLoader<'a> {
    /// Create a loader that keeps every supported condition and reads Latin-1.
    pub fn new(normalizer: &'a TextNormalizer) -> Self {
        Self {
            normalizer,
            conditions: Condition::ALL.to_vec(),
            encoding: TextEncoding::default(),
        }
    }

    /// Restrict the conditions that are kept.
    pub fn with_conditions(mut self, conditions: &[Condition]) -> Self {
        self.conditions = conditions.to_vec();
        self
    }

    /// Set the file encoding.
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Load a dataset file.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> DatasetResult<Corpus> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let (corpus, stats) = self.load_from_reader(file)?;
        info!(
            path = %path.display(),
            rows = stats.rows_read,
            retained = stats.retained,
            "loaded review dataset"
        );
        Ok(corpus)
    }

    /// Load a dataset from any reader.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> DatasetResult<(Corpus, LoadStats)> {
        // Short rows are dropped as incomplete; long rows are checked below
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.byte_headers()?;
        let expected = headers.len();
        let columns = self.column_index(headers)?;

        let mut stats = LoadStats::default();
        let mut entries = Vec::new();

        for result in csv_reader.byte_records() {
            let record = result?;
            stats.rows_read += 1;

            let line = record.position().map(|p| p.line()).unwrap_or(0);
            if record.len() > expected {
                return Err(DatasetError::TooManyFields {
                    line,
                    expected,
                    found: record.len(),
                });
            }

            let drug_name = self.field(&record, columns.drug_name, DRUG_NAME_COLUMN, line)?;
            let condition = self.field(&record, columns.condition, CONDITION_COLUMN, line)?;
            let text = self.field(&record, columns.review, REVIEW_COLUMN, line)?;

            let (Some(drug_name), Some(condition), Some(text)) = (drug_name, condition, text)
            else {
                stats.missing_fields += 1;
                continue;
            };

            let Some(condition) = Condition::from_label(&condition)
                .filter(|c| self.conditions.contains(c))
            else {
                stats.unsupported_condition += 1;
                continue;
            };

            let normalized = self.normalizer.normalize(&text);
            entries.push(CorpusEntry {
                review: Review::new(drug_name, condition, text),
                normalized,
            });
        }

        stats.retained = entries.len();
        if stats.missing_fields > 0 {
            warn!(count = stats.missing_fields, "dropped rows with missing fields");
        }

        Ok((Corpus::new(entries), stats))
    }

    /// Locate the required columns in the header row.
    fn column_index(&self, headers: &csv::ByteRecord) -> DatasetResult<ColumnIndex> {
        let names = headers
            .iter()
            .map(|h| {
                self.encoding
                    .decode(h)
                    .map(|name| name.trim_start_matches('\u{feff}').to_string())
                    .ok_or_else(|| DatasetError::InvalidEncoding {
                        column: "<header>".to_string(),
                        line: 1,
                    })
            })
            .collect::<DatasetResult<Vec<String>>>()?;

        let find = |column: &'static str| {
            names
                .iter()
                .position(|n| n == column)
                .ok_or(DatasetError::MissingColumn(column))
        };

        Ok(ColumnIndex {
            drug_name: find(DRUG_NAME_COLUMN)?,
            condition: find(CONDITION_COLUMN)?,
            review: find(REVIEW_COLUMN)?,
        })
    }

    /// Decode one field; `None` when it is absent or an NA marker.
    fn field(
        &self,
        record: &csv::ByteRecord,
        index: usize,
        column: &str,
        line: u64,
    ) -> DatasetResult<Option<String>> {
        let Some(bytes) = record.get(index) else {
            return Ok(None);
        };

        let value = self
            .encoding
            .decode(bytes)
            .ok_or_else(|| DatasetError::InvalidEncoding {
                column: column.to_string(),
                line,
            })?;

        if NA_VALUES.contains(&value.as_str()) {
            Ok(None)
        } else {
            Ok(Some(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
,drugName,condition,review,rating,date,usefulCount
1,Sertraline,Depression,\"\"\"I&#039;ve had fewer mood swings\"\"\",9,\"May 20, 2012\",27
2,Lisinopril,High Blood Pressure,\"Blood pressure is finally down.\",8,\"April 27, 2010\",192
3,Metformin,\"Diabetes, Type 2\",\"Diagnosed last year, works well\",7,\"March 1, 2015\",11
4,Accutane,Acne,\"Cleared my skin\",10,\"June 1, 2016\",4
5,Prozac,,\"No condition given\",5,\"June 2, 2016\",1
6,,Depression,\"No drug given\",5,\"June 3, 2016\",1
7,Zoloft,Depression,NaN,5,\"June 4, 2016\",1
";

    #[test]
    fn test_load_filters_rows() {
        let normalizer = TextNormalizer::new();
        let loader = DatasetLoader::new(&normalizer);

        let (corpus, stats) = loader.load_from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(stats.rows_read, 7);
        assert_eq!(stats.missing_fields, 3);
        assert_eq!(stats.unsupported_condition, 1);
        assert_eq!(stats.retained, 3);

        let drugs: Vec<&str> = corpus.entries().iter().map(|e| e.drug_name()).collect();
        assert_eq!(drugs, vec!["Sertraline", "Lisinopril", "Metformin"]);
        assert_eq!(corpus.entries()[2].condition(), Condition::DiabetesType2);
    }

    #[test]
    fn test_reviews_normalized_at_load() {
        let normalizer = TextNormalizer::new();
        let loader = DatasetLoader::new(&normalizer);

        let (corpus, _) = loader.load_from_reader(SAMPLE.as_bytes()).unwrap();

        let first = &corpus.entries()[0];
        assert_eq!(first.review.text, "\"I&#039;ve had fewer mood swings\"");
        assert_eq!(first.normalized, "ive fewer mood swing");
    }

    #[test]
    fn test_condition_restriction() {
        let normalizer = TextNormalizer::new();
        let loader = DatasetLoader::new(&normalizer).with_conditions(&[Condition::Depression]);

        let (corpus, stats) = loader.load_from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(corpus.len(), 1);
        assert_eq!(stats.unsupported_condition, 3);
    }

    #[test]
    fn test_missing_column() {
        let normalizer = TextNormalizer::new();
        let loader = DatasetLoader::new(&normalizer);

        let data = "drugName,condition,text\nA,Depression,hello\n";
        let result = loader.load_from_reader(data.as_bytes());

        assert!(matches!(result, Err(DatasetError::MissingColumn("review"))));
    }

    #[test]
    fn test_empty_input_is_missing_columns() {
        let normalizer = TextNormalizer::new();
        let loader = DatasetLoader::new(&normalizer);

        let result = loader.load_from_reader("".as_bytes());
        assert!(matches!(result, Err(DatasetError::MissingColumn(_))));
    }

    #[test]
    fn test_latin1_decoding() {
        let normalizer = TextNormalizer::new();
        let loader = DatasetLoader::new(&normalizer);

        let mut data = b"drugName,condition,review\nCaf".to_vec();
        data.push(0xE9); // é in Latin-1
        data.extend_from_slice(b",Depression,mood swing\n");

        let (corpus, _) = loader.load_from_reader(data.as_slice()).unwrap();
        assert_eq!(corpus.entries()[0].drug_name(), "Café");
    }

    #[test]
    fn test_strict_utf8_rejects_invalid_bytes() {
        let normalizer = TextNormalizer::new();
        let loader = DatasetLoader::new(&normalizer).with_encoding(TextEncoding::Utf8);

        let mut data = b"drugName,condition,review\nA,Depression,bad ".to_vec();
        data.push(0xFF);
        data.push(b'\n');

        let result = loader.load_from_reader(data.as_slice());
        assert!(matches!(
            result,
            Err(DatasetError::InvalidEncoding { ref column, .. }) if column == "review"
        ));
    }

    #[test]
    fn test_utf8_bom_header() {
        let normalizer = TextNormalizer::new();
        let loader = DatasetLoader::new(&normalizer).with_encoding(TextEncoding::Utf8);

        let data = "\u{feff}drugName,condition,review\nA,Depression,mood\n";
        let (corpus, _) = loader.load_from_reader(data.as_bytes()).unwrap();
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let normalizer = TextNormalizer::new();
        let loader = DatasetLoader::new(&normalizer);

        let result = loader.load("/nonexistent/drugs.csv");
        assert!(matches!(result, Err(DatasetError::Open { .. })));
    }

    #[test]
    fn test_short_row_is_dropped() {
        let normalizer = TextNormalizer::new();
        let loader = DatasetLoader::new(&normalizer);

        let data = "drugName,condition,review\nA,Depression,mood swing\nB,Depression\nC,Depression,sad mood\n";
        let (corpus, stats) = loader.load_from_reader(data.as_bytes()).unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(stats.rows_read, 3);
        assert_eq!(stats.missing_fields, 1);
        let drugs: Vec<&str> = corpus.entries().iter().map(|e| e.drug_name()).collect();
        assert_eq!(drugs, vec!["A", "C"]);
    }

    #[test]
    fn test_long_row_is_error() {
        let normalizer = TextNormalizer::new();
        let loader = DatasetLoader::new(&normalizer);

        let data = "drugName,condition,review\nA,Depression,mood\nB,Depression,sad,extra\n";
        assert!(matches!(
            loader.load_from_reader(data.as_bytes()),
            Err(DatasetError::TooManyFields {
                line: 3,
                expected: 3,
                found: 4
            })
        ));
    }

    #[test]
    fn test_strict_utf8_rejects_invalid_header() {
        let normalizer = TextNormalizer::new();
        let loader = DatasetLoader::new(&normalizer).with_encoding(TextEncoding::Utf8);

        let mut data = b"drugName,condition,rev".to_vec();
        data.push(0xFF);
        data.extend_from_slice(b"iew\nA,Depression,mood\n");

        let result = loader.load_from_reader(data.as_slice());
        assert!(matches!(
            result,
            Err(DatasetError::InvalidEncoding { ref column, line: 1 }) if column == "<header>"
        ));
    }
}
