//! Record data structures for news digest aggregation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Popularity reported by a source
///
/// Hot boards report either a plain number or a human readable magnitude
/// such as `"1.2万"`; the engine turns both into a numeric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Popularity {
    /// Numeric heat value
    Count(f64),
    /// Magnitude string as published by the source
    Text(String),
}

impl From<f64> for Popularity {
    fn from(value: f64) -> Self {
        Popularity::Count(value)
    }
}

impl From<&str> for Popularity {
    fn from(value: &str) -> Self {
        Popularity::Text(value.to_string())
    }
}

/// A candidate story harvested from a source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Headline as published
    pub title: String,
    /// Article URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Source label (feed name or hot-board platform)
    pub source: String,
    /// Plain-text summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw publication timestamp, parsed by the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// 1-based position the source assigned the story
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_in_source: Option<u32>,
    /// Heat value reported by the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<Popularity>,
}

impl Record {
    pub fn new(title: &str, source: &str) -> Self {
        Self {
            title: title.to_string(),
            source: source.to_string(),
            ..Self::default()
        }
    }

    pub fn with_link(mut self, link: &str) -> Self {
        self.link = Some(link.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn published(mut self, published_at: &str) -> Self {
        self.published_at = Some(published_at.to_string());
        self
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank_in_source = Some(rank);
        self
    }

    pub fn with_popularity(mut self, popularity: impl Into<Popularity>) -> Self {
        self.popularity = Some(popularity.into());
        self
    }

    /// Link or the empty string
    pub fn link_str(&self) -> &str {
        self.link.as_deref().unwrap_or_default()
    }

    /// Description or the empty string
    pub fn description_str(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Whether a non-blank description is present
    pub fn has_description(&self) -> bool {
        !self.description_str().trim().is_empty()
    }
}

/// A record carried through the single-list pipeline with its derived fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    #[serde(flatten)]
    pub record: Record,
    /// Publication time once the engine parsed it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_time: Option<DateTime<Utc>>,
    /// Importance score, zero until scored
    #[serde(default)]
    pub score: f64,
}

impl Story {
    pub fn title(&self) -> &str {
        &self.record.title
    }

    pub fn source(&self) -> &str {
        &self.record.source
    }
}

impl From<Record> for Story {
    fn from(record: Record) -> Self {
        Self {
            record,
            parsed_time: None,
            score: 0.0,
        }
    }
}
