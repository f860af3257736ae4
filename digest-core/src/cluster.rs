//! Story clusters built from records of several sources

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::{Popularity, Record};

/// A group of records judged to represent the same story
///
/// The representative title is taken from the first member and never changes,
/// so later members are always compared against the same anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Title of the member that opened the cluster
    pub representative_title: String,
    /// Members in arrival order
    pub members: Vec<Record>,
    /// Distinct source labels in first-seen order
    pub platforms: IndexSet<String>,
}

impl Cluster {
    /// Open a cluster anchored on its first record
    pub fn new(first: Record) -> Self {
        let mut platforms = IndexSet::new();
        platforms.insert(first.source.clone());
        Self {
            representative_title: first.title.clone(),
            members: vec![first],
            platforms,
        }
    }

    /// Append a member
    pub fn push(&mut self, record: Record) {
        self.platforms.insert(record.source.clone());
        self.members.push(record);
    }

    /// Number of distinct sources that reported the story
    pub fn platform_count(&self) -> usize {
        self.platforms.len()
    }
}

/// A scored cluster ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCluster {
    /// Display title (the best member's title)
    pub title: String,
    /// Display link (the best member's link)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Display heat (the best member's popularity)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<Popularity>,
    /// Anchor title the cluster was built around
    pub representative_title: String,
    /// Distinct source labels
    pub platforms: Vec<String>,
    pub platform_count: usize,
    pub member_count: usize,
    /// Latest parseable member timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_time: Option<DateTime<Utc>>,
    pub score: f64,
}
