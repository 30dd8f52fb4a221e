//! Review text normalization.
//!
//! Pipeline: strip markup → drop punctuation → lowercase → letters only →
//! tokenize → drop stopwords → lemmatize → rejoin.

mod lemmatizer;
mod markup;
mod stopwords;

pub use lemmatizer::*;
pub use markup::*;
pub use stopwords::*;

/// Normalizer for free-text reviews.
///
/// Pure: the output depends only on the input and the static tables.
#[derive(Default)]
pub struct TextNormalizer {
    lemmatizer: Lemmatizer,
}

impl TextNormalizer {
    /// Create a normalizer with the default lemma tables.
    pub fn new() -> Self {
        Self {
            lemmatizer: Lemmatizer::new(),
        }
    }

    /// Create a normalizer with a customized lemmatizer.
    pub fn with_lemmatizer(lemmatizer: Lemmatizer) -> Self {
        Self { lemmatizer }
    }

    /// Normalize raw review text into space-joined base-form tokens.
    pub fn normalize(&self, raw: &str) -> String {
        let text = strip_markup(raw);

        let letters: String = text
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .flat_map(char::to_lowercase)
            .map(|c| if c.is_ascii_alphabetic() { c } else { ' ' })
            .collect();

        letters
            .split_whitespace()
            .filter(|token| !is_stopword(token))
            .map(|token| self.lemmatize_token(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Get the lemmatizer for direct access.
    pub fn lemmatizer(&self) -> &Lemmatizer {
        &self.lemmatizer
    }

    fn lemmatize_token(&self, token: &str) -> String {
        let lemma = self.lemmatizer.lemmatize(token);
        // "whys" → "why" would reintroduce a stopword
        if is_stopword(&lemma) {
            token.to_string()
        } else {
            lemma
        }
    }
}
