//! Title tokenization and similarity
//!
//! Two tiers: normalized titles that are equal or contain one another are
//! near-certain matches and short-circuit; everything else is compared by the
//! Jaccard index of stopword-filtered token sets.

use std::collections::{BTreeSet, HashSet};

use tracing::trace;

/// Similarity reported when one normalized title contains the other
pub const CONTAINMENT_SIMILARITY: f64 = 0.9;

/// Normalized tokens of a title
pub type TokenSet = BTreeSet<String>;

/// Stopword table, case-folded at construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stopwords(HashSet<String>);

impl Stopwords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        )
    }

    /// The default table of function words, numerals and demonstratives
    pub fn standard() -> Self {
        Self::new(digest_core::config::default_stopwords())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// CJK unified ideographs, each of which is tokenized on its own
pub fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Case-fold and drop punctuation, keeping letters, digits, CJK and spaces
pub fn normalize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Split a title into comparable tokens
///
/// Runs of letters/digits form one token and are kept when longer than one
/// character; every CJK character is a token of its own. Stopwords are
/// dropped in both cases.
pub fn tokenize(title: &str, stopwords: &Stopwords) -> TokenSet {
    let mut tokens = TokenSet::new();
    let mut word = String::new();

    for c in title.to_lowercase().chars() {
        if is_cjk(c) {
            flush_word(&mut word, &mut tokens, stopwords);
            let token = c.to_string();
            if !stopwords.contains(&token) {
                tokens.insert(token);
            }
        } else if c.is_alphanumeric() {
            word.push(c);
        } else {
            flush_word(&mut word, &mut tokens, stopwords);
        }
    }
    flush_word(&mut word, &mut tokens, stopwords);

    tokens
}

fn flush_word(word: &mut String, tokens: &mut TokenSet, stopwords: &Stopwords) {
    if word.chars().count() > 1 && !stopwords.contains(word) {
        tokens.insert(std::mem::take(word));
    } else {
        word.clear();
    }
}

/// Jaccard index |A ∩ B| / |A ∪ B|, zero for an empty union
pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Similarity of two headlines in `[0, 1]`
///
/// Symmetric in its arguments; a non-blank title is fully similar to itself
/// and a blank one is similar to nothing.
pub fn title_similarity(a: &str, b: &str, stopwords: &Stopwords) -> f64 {
    let norm_a = normalize_title(a);
    let norm_b = normalize_title(b);

    if norm_a.is_empty() || norm_b.is_empty() {
        return 0.0;
    }
    if norm_a == norm_b {
        return 1.0;
    }
    if norm_a.contains(&norm_b) || norm_b.contains(&norm_a) {
        return CONTAINMENT_SIMILARITY;
    }

    let score = jaccard(&tokenize(a, stopwords), &tokenize(b, stopwords));
    trace!("Similarity {:.3} between {:?} and {:?}", score, a, b);
    score
}
