//! Importance scores for single stories and clusters

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use digest_core::{Cluster, Story};

use crate::keywords::Keywords;
use crate::popularity::popularity_value;

/// Bonus for a title containing a hot keyword
pub const HOT_BONUS: f64 = 2.0;
/// Bonus for carrying a non-blank description
pub const DESCRIPTION_BONUS: f64 = 0.2;
/// Recency bonus of a story published right now
pub const RECENCY_WEIGHT: f64 = 3.0;
/// Score per distinct source reporting a cluster
pub const PLATFORM_SCORE: f64 = 100.0;
/// Rank 1 scores `RANK_CEILING - 1`, rank 20 scores 1
pub const RANK_CEILING: f64 = 21.0;
/// Popularity units per point of heat score
pub const POPULARITY_SCALE: f64 = 100_000.0;
/// Upper bound on the heat score
pub const POPULARITY_CAP: f64 = 50.0;

/// Whether the title mentions any hot keyword
pub fn is_hot(title: &str, hot_keywords: &Keywords) -> bool {
    hot_keywords.matches(title)
}

/// Linear recency decay over the window, in `[0, RECENCY_WEIGHT]`
///
/// Future timestamps count as brand new. Without a timestamp or a positive
/// window there is no bonus.
pub fn recency_bonus(parsed: Option<DateTime<Utc>>, now: DateTime<Utc>, window_hours: i64) -> f64 {
    let Some(published) = parsed else {
        return 0.0;
    };
    if window_hours <= 0 {
        return 0.0;
    }

    let age_hours = (now - published).num_milliseconds() as f64 / 3_600_000.0;
    let freshness = (1.0 - age_hours / window_hours as f64).clamp(0.0, 1.0);
    freshness * RECENCY_WEIGHT
}

/// Score of a story in the feed digest
///
/// Sum of the source weight (1.0 when unlisted), the hot keyword bonus, the
/// description bonus and the recency bonus.
pub fn score_story(
    story: &Story,
    source_weights: &HashMap<String, f64>,
    hot_keywords: &Keywords,
    now: DateTime<Utc>,
    window_hours: i64,
) -> f64 {
    let mut score = source_weights.get(story.source()).copied().unwrap_or(1.0);

    if is_hot(story.title(), hot_keywords) {
        score += HOT_BONUS;
    }
    if story.record.has_description() {
        score += DESCRIPTION_BONUS;
    }

    score + recency_bonus(story.parsed_time, now, window_hours)
}

/// Score of a hot-board cluster
///
/// `100 × platforms + mean rank score + heat score`. Members without a rank
/// are left out of the mean and members without a usable popularity are
/// left out of the maximum.
pub fn score_cluster(cluster: &Cluster, platform_weights: &HashMap<String, f64>) -> f64 {
    let platform_score = PLATFORM_SCORE * cluster.platform_count() as f64;

    let rank_scores: Vec<f64> = cluster
        .members
        .iter()
        .filter_map(|member| {
            let rank = member.rank_in_source?;
            let weight = platform_weights.get(&member.source).copied().unwrap_or(1.0);
            Some((RANK_CEILING - rank as f64) * weight)
        })
        .collect();
    let avg_rank_score = if rank_scores.is_empty() {
        0.0
    } else {
        rank_scores.iter().sum::<f64>() / rank_scores.len() as f64
    };

    let max_popularity = cluster
        .members
        .iter()
        .filter_map(|member| member.popularity.as_ref().and_then(popularity_value))
        .fold(0.0_f64, f64::max);
    let hot_score = (max_popularity / POPULARITY_SCALE).min(POPULARITY_CAP);

    platform_score + avg_rank_score + hot_score
}
