//! Keyword policy and primary/fallback time windows

use chrono::{DateTime, Duration, Utc};
use digest_core::{Record, Story};
use serde::Serialize;
use tracing::debug;

use crate::keywords::Keywords;
use crate::timestamp::parse_timestamp;

/// Which window a digest was drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    Primary,
    Fallback,
}

/// Window sizes and keyword filters applied before deduplication
#[derive(Debug, Clone, PartialEq)]
pub struct WindowPolicy {
    pub primary_hours: i64,
    pub fallback_hours: i64,
    /// Records must mention one of these in title or description; empty
    /// admits nothing
    pub include: Keywords,
    /// Records mentioning one of these in title or description are dropped
    pub exclude: Keywords,
}

/// Result of window filtering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowBuckets {
    /// Published within the primary window
    pub primary: Vec<Story>,
    /// Published within the fallback window but before the primary one
    pub fallback: Vec<Story>,
    pub excluded: usize,
    pub unmatched: usize,
    pub undated: usize,
    pub expired: usize,
}

impl WindowBuckets {
    /// Primary stories when there are any, otherwise the fallback ones
    pub fn select(self) -> (Window, Vec<Story>) {
        if self.primary.is_empty() {
            (Window::Fallback, self.fallback)
        } else {
            (Window::Primary, self.primary)
        }
    }
}

/// Start of a window reaching `hours` back from `now`
///
/// Saturates at the earliest representable time instead of overflowing.
pub fn window_start(now: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
    Duration::try_hours(hours)
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Split records into primary and fallback buckets
///
/// Exclusion is checked first, then inclusion, then the timestamp. Both
/// keyword rules look at the title and the description. Records whose
/// timestamp is missing or unparseable are dropped from both buckets.
pub fn filter_window(records: Vec<Record>, now: DateTime<Utc>, policy: &WindowPolicy) -> WindowBuckets {
    let primary_cutoff = window_start(now, policy.primary_hours);
    let fallback_cutoff = window_start(now, policy.fallback_hours);
    let mut buckets = WindowBuckets::default();

    for record in records {
        let title = record.title.to_lowercase();
        let description = record.description_str().to_lowercase();

        if policy.exclude.matches_folded(&title) || policy.exclude.matches_folded(&description) {
            buckets.excluded += 1;
            continue;
        }
        if !(policy.include.matches_folded(&title) || policy.include.matches_folded(&description)) {
            buckets.unmatched += 1;
            continue;
        }

        let Some(parsed) = record.published_at.as_deref().and_then(parse_timestamp) else {
            buckets.undated += 1;
            continue;
        };

        let story = Story {
            record,
            parsed_time: Some(parsed),
            score: 0.0,
        };
        if parsed >= primary_cutoff {
            buckets.primary.push(story);
        } else if parsed >= fallback_cutoff {
            buckets.fallback.push(story);
        } else {
            buckets.expired += 1;
        }
    }

    debug!(
        "Window filter: {} primary, {} fallback, {} excluded, {} unmatched, {} undated, {} expired",
        buckets.primary.len(),
        buckets.fallback.len(),
        buckets.excluded,
        buckets.unmatched,
        buckets.undated,
        buckets.expired
    );
    buckets
}
