//! Run-level façade over the digest pipelines

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use digest_core::{DigestConfig, RankedCluster, Record, Story};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::cluster::{build_clusters, summarize_cluster};
use crate::keywords::Keywords;
use crate::rank::rank_and_select;
use crate::scoring::score_story;
use crate::similarity::Stopwords;
use crate::suppress::suppress_duplicates;
use crate::window::{filter_window, Window, WindowPolicy};

/// Immutable parameter snapshot for one run
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub primary_hours: i64,
    pub fallback_hours: i64,
    pub max_items: i64,
    pub include: Keywords,
    pub exclude: Keywords,
    pub hot_keywords: Keywords,
    pub source_weights: HashMap<String, f64>,
    pub platform_weights: HashMap<String, f64>,
    pub stopwords: Stopwords,
    pub similarity_threshold: f64,
    pub cluster_threshold: f64,
}

impl From<&DigestConfig> for EngineConfig {
    fn from(config: &DigestConfig) -> Self {
        Self {
            primary_hours: config.hours,
            fallback_hours: config.fallback_hours,
            max_items: config.max_items,
            include: Keywords::new(&config.include_keywords),
            exclude: Keywords::new(&config.exclude_keywords),
            hot_keywords: Keywords::new(&config.hot_keywords),
            source_weights: config.source_weights.clone().into_iter().collect(),
            platform_weights: config.platform_weights.clone().into_iter().collect(),
            stopwords: Stopwords::new(&config.stopwords),
            similarity_threshold: config.similarity_threshold,
            cluster_threshold: config.cluster_threshold,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(&DigestConfig::default())
    }
}

impl EngineConfig {
    fn window_policy(&self) -> WindowPolicy {
        WindowPolicy {
            primary_hours: self.primary_hours,
            fallback_hours: self.fallback_hours,
            include: self.include.clone(),
            exclude: self.exclude.clone(),
        }
    }
}

/// Outcome of a feed digest run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigestOutcome {
    /// Window the stories were drawn from
    pub window: Window,
    pub primary_count: usize,
    pub fallback_count: usize,
    pub excluded: usize,
    pub unmatched: usize,
    pub undated: usize,
    pub expired: usize,
    /// Stories dropped as duplicates of an earlier one
    pub suppressed: usize,
    /// Ranked, deduplicated stories
    pub stories: Vec<Story>,
}

/// Deduplication and ranking engine
///
/// Holds no state besides its configuration; each run is independent.
#[derive(Debug, Clone, Default)]
pub struct DigestEngine {
    config: EngineConfig,
}

impl DigestEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Feed digest: window filter, duplicate suppression, scoring, ranking
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn run_digest(&self, records: Vec<Record>, now: DateTime<Utc>) -> DigestOutcome {
        let cfg = &self.config;
        let buckets = filter_window(records, now, &cfg.window_policy());
        let primary_count = buckets.primary.len();
        let fallback_count = buckets.fallback.len();
        let (excluded, unmatched, undated, expired) =
            (buckets.excluded, buckets.unmatched, buckets.undated, buckets.expired);

        let (window, candidates) = buckets.select();
        if window == Window::Fallback && !candidates.is_empty() {
            info!(
                "No stories within {}h, using {}h window",
                cfg.primary_hours, cfg.fallback_hours
            );
        }

        let candidate_count = candidates.len();
        let mut stories = suppress_duplicates(candidates, cfg.similarity_threshold, &cfg.stopwords);
        let suppressed = candidate_count - stories.len();

        for story in &mut stories {
            let score = score_story(
                story,
                &cfg.source_weights,
                &cfg.hot_keywords,
                now,
                cfg.primary_hours,
            );
            story.score = score;
        }
        let stories = rank_and_select(stories, cfg.max_items);

        debug!(
            "Digest selected {} stories ({} suppressed) from {:?} window",
            stories.len(),
            suppressed,
            window
        );

        DigestOutcome {
            window,
            primary_count,
            fallback_count,
            excluded,
            unmatched,
            undated,
            expired,
            suppressed,
            stories,
        }
    }

    /// Hot boards: cluster across sources, score clusters, rank
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn run_hot(&self, records: Vec<Record>) -> Vec<RankedCluster> {
        let cfg = &self.config;
        let clusters = build_clusters(records, cfg.cluster_threshold, &cfg.stopwords);

        let summaries: Vec<RankedCluster> = clusters
            .iter()
            .map(|cluster| summarize_cluster(cluster, &cfg.platform_weights))
            .collect();
        let ranked = rank_and_select(summaries, cfg.max_items);

        debug!("Hot ranking kept {} of {} clusters", ranked.len(), clusters.len());
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn engine(include: &[&str]) -> DigestEngine {
        let config = DigestConfig {
            include_keywords: include.iter().map(|s| s.to_string()).collect(),
            exclude_keywords: Vec::new(),
            ..DigestConfig::default()
        };
        DigestEngine::new(EngineConfig::from(&config))
    }

    #[test]
    fn test_config_snapshot_from_digest_config() {
        let config = EngineConfig::default();
        let defaults = DigestConfig::default();
        assert_eq!(config.primary_hours, defaults.hours);
        assert_eq!(config.fallback_hours, defaults.fallback_hours);
        assert_eq!(config.similarity_threshold, 0.7);
        assert_eq!(config.cluster_threshold, 0.6);
        assert!(!config.stopwords.is_empty());
    }

    #[test]
    fn test_run_digest_primary_window() {
        let now = Utc::now();
        let records = vec![
            Record::new("AI news", "test").with_link("https://a.com/1").published(&now.to_rfc3339()),
            Record::new("Sports news", "test").with_link("https://a.com/2").published(&now.to_rfc3339()),
        ];
        let outcome = engine(&["AI"]).run_digest(records, now);
        assert_eq!(outcome.window, Window::Primary);
        assert_eq!(outcome.stories.len(), 1);
        assert_eq!(outcome.stories[0].title(), "AI news");
        assert!(outcome.stories[0].score > 0.0);
    }

    #[test]
    fn test_run_digest_uses_fallback() {
        let now = Utc::now();
        let published = (now - Duration::hours(30)).to_rfc3339();
        let records = vec![Record::new("AI older story", "test").published(&published)];
        let outcome = engine(&["AI"]).run_digest(records, now);
        assert_eq!(outcome.window, Window::Fallback);
        assert_eq!(outcome.primary_count, 0);
        assert_eq!(outcome.fallback_count, 1);
        assert_eq!(outcome.stories.len(), 1);
    }

    #[test]
    fn test_run_digest_empty() {
        let outcome = engine(&[]).run_digest(Vec::new(), Utc::now());
        assert!(outcome.stories.is_empty());
        assert_eq!(outcome.suppressed, 0);
    }

    #[test]
    fn test_run_hot_empty() {
        assert!(engine(&[]).run_hot(Vec::new()).is_empty());
    }
}
