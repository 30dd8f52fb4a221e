//! Rule-based noun lemmatizer.
//!
//! Reduces plural nouns to their dictionary form:
//! - Irregular plurals from an exception table (women→woman, diagnoses→diagnosis)
//! - Words that only look plural are kept (diabetes, always, species)
//! - Suffix rules otherwise (allergies→allergy, rashes→rash, swings→swing)
//!
//! Tokens with no applicable rule come back unchanged.

use std::collections::{HashMap, HashSet};

/// Words of this length or shorter are never suffix-stripped.
const MIN_STRIP_LEN: usize = 3;

/// Endings that look plural but are not (glass, virus, arthritis, nervous).
const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is", "ous"];

/// Lemmatizer for lower-case ASCII tokens.
pub struct Lemmatizer {
    /// Irregular plural → singular
    exceptions: HashMap<String, String>,
    /// Words ending in `s` that are already base forms
    invariants: HashSet<String>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer {
    /// Create a lemmatizer with the default tables.
    pub fn new() -> Self {
        Self {
            exceptions: Self::default_exceptions(),
            invariants: Self::default_invariants(),
        }
    }

    /// Reduce a token to its base form, or return it unchanged.
    pub fn lemmatize(&self, token: &str) -> String {
        if let Some(lemma) = self.exceptions.get(token) {
            return lemma.clone();
        }
        if self.invariants.contains(token) {
            return token.to_string();
        }
        match apply_suffix_rules(token) {
            // "mens" strips to an irregular form; resolve it so lemmas stay fixed points
            Some(stem) => self.exceptions.get(&stem).cloned().unwrap_or(stem),
            None => token.to_string(),
        }
    }

    /// Add a custom irregular form.
    pub fn add_exception(&mut self, inflected: &str, lemma: &str) {
        self.exceptions
            .insert(inflected.to_lowercase(), lemma.to_lowercase());
    }

    /// Mark a word as already being a base form.
    pub fn add_invariant(&mut self, word: &str) {
        self.invariants.insert(word.to_lowercase());
    }

    /// Default irregular plurals.
    fn default_exceptions() -> HashMap<String, String> {
        let mut map = HashMap::new();

        // Vowel change
        map.insert("men".into(), "man".into());
        map.insert("women".into(), "woman".into());
        map.insert("children".into(), "child".into());
        map.insert("feet".into(), "foot".into());
        map.insert("teeth".into(), "tooth".into());
        map.insert("mice".into(), "mouse".into());
        map.insert("geese".into(), "goose".into());

        // f → ves
        map.insert("lives".into(), "life".into());
        map.insert("wives".into(), "wife".into());
        map.insert("knives".into(), "knife".into());
        map.insert("leaves".into(), "leaf".into());
        map.insert("halves".into(), "half".into());
        map.insert("shelves".into(), "shelf".into());
        map.insert("thieves".into(), "thief".into());
        map.insert("wolves".into(), "wolf".into());
        map.insert("calves".into(), "calf".into());

        // Greek/Latin plurals common in medical writing
        map.insert("diagnoses".into(), "diagnosis".into());
        map.insert("prognoses".into(), "prognosis".into());
        map.insert("analyses".into(), "analysis".into());
        map.insert("crises".into(), "crisis".into());
        map.insert("psychoses".into(), "psychosis".into());
        map.insert("neuroses".into(), "neurosis".into());
        map.insert("hypotheses".into(), "hypothesis".into());
        map.insert("bacteria".into(), "bacterium".into());
        map.insert("criteria".into(), "criterion".into());
        map.insert("phenomena".into(), "phenomenon".into());
        map.insert("stimuli".into(), "stimulus".into());
        map.insert("nuclei".into(), "nucleus".into());
        map.insert("vertebrae".into(), "vertebra".into());

        map
    }

    /// Default words that end in `s` but are not plurals.
    fn default_invariants() -> HashSet<String> {
        [
            // Conditions
            "diabetes", "herpes", "measles", "mumps", "rabies", "scabies", "rickets",
            "shingles", "hives", "aids", "diabetics",
            // Invariant nouns
            "series", "species", "news", "means", "lens", "physics", "genetics",
            "ethics", "economics", "politics", "athletics", "pants", "scissors",
            // Adverbs and connectives
            "always", "sometimes", "perhaps", "afterwards", "towards", "besides",
            "whereas", "nowadays", "overseas", "indoors", "outdoors", "downstairs",
            "upstairs", "sideways", "backwards", "forwards", "anyways", "nevertheless",
            "regardless", "unless", "less", "thus", "yes", "plus", "minus",
        ]
        .iter()
        .map(|w| w.to_string())
        .collect()
    }
}

/// Strip a plural suffix, if any rule applies.
fn apply_suffix_rules(token: &str) -> Option<String> {
    if token.len() <= MIN_STRIP_LEN || !token.ends_with('s') {
        return None;
    }
    if SINGULAR_ENDINGS.iter().any(|e| token.ends_with(e)) {
        return None;
    }

    let stem = &token[..token.len() - 1];

    // allergies → allergy, but ties/dies/lies → tie/die/lie
    if let Some(base) = token.strip_suffix("ies") {
        return Some(if token.len() > 4 {
            format!("{}y", base)
        } else {
            stem.to_string()
        });
    }

    if let Some(base) = token.strip_suffix("es") {
        // headaches → headache, but rashes → rash, stitches → stitch
        if base.ends_with("sh") || base.ends_with('x') || base.ends_with("zz") {
            return Some(base.to_string());
        }
        if base.ends_with("ch") && !base.ends_with("ach") {
            return Some(base.to_string());
        }
        // glasses → glass, viruses → virus
        if SINGULAR_ENDINGS.iter().any(|e| base.ends_with(e)) && base.len() > MIN_STRIP_LEN {
            return Some(base.to_string());
        }
    }

    Some(stem.to_string())
}
