//! Case-insensitive keyword lists

/// Keywords matched as case-folded substrings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Keywords(Vec<String>);

impl Keywords {
    /// Build from raw keywords; blank entries are dropped
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.trim().is_empty())
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether any keyword occurs in `text`
    pub fn matches(&self, text: &str) -> bool {
        self.matches_folded(&text.to_lowercase())
    }

    /// Like [`Keywords::matches`] for text that is already case-folded
    pub fn matches_folded(&self, folded: &str) -> bool {
        self.0.iter().any(|k| folded.contains(k.as_str()))
    }
}
