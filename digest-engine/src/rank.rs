//! Ordering and truncation of scored output

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use digest_core::{RankedCluster, Story};

/// Anything the ranker can order
pub trait Rankable {
    fn rank_score(&self) -> f64;
    fn rank_time(&self) -> Option<DateTime<Utc>>;
}

impl Rankable for Story {
    fn rank_score(&self) -> f64 {
        self.score
    }

    fn rank_time(&self) -> Option<DateTime<Utc>> {
        self.parsed_time
    }
}

impl Rankable for RankedCluster {
    fn rank_score(&self) -> f64 {
        self.score
    }

    fn rank_time(&self) -> Option<DateTime<Utc>> {
        self.latest_time
    }
}

/// Sort by score then time, both descending, and keep the top `max_items`
///
/// Missing times sort last. The sort is stable and `max_items <= 0` keeps
/// everything.
pub fn rank_and_select<T: Rankable>(mut items: Vec<T>, max_items: i64) -> Vec<T> {
    items.sort_by(|a, b| {
        b.rank_score()
            .total_cmp(&a.rank_score())
            .then_with(|| compare_time(b.rank_time(), a.rank_time()))
    });

    if max_items > 0 {
        items.truncate(max_items as usize);
    }
    items
}

fn compare_time(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}
