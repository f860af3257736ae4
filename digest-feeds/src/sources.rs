//! Feed source definitions

use digest_core::config::default_sources;
use indexmap::IndexMap;

/// An RSS or Atom feed to harvest
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSource {
    /// Source label attached to every record of the feed
    pub name: String,
    /// Feed URL
    pub url: String,
}

impl FeedSource {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    /// Build sources from a name → URL table, keeping its order
    pub fn from_table(table: &IndexMap<String, String>) -> Vec<Self> {
        table.iter().map(|(name, url)| Self::new(name, url)).collect()
    }

    /// arXiv listings get paper-specific titles and descriptions
    pub fn is_arxiv(&self) -> bool {
        self.name.to_lowercase().contains("arxiv")
    }
}

/// Curated list of AI and tech feeds
pub fn curated_sources() -> Vec<FeedSource> {
    FeedSource::from_table(&default_sources())
}
