//! Conditional-GET validator cache
//!
//! Remembers the `ETag` and `Last-Modified` headers each feed answered with,
//! so the next run can send `If-None-Match` / `If-Modified-Since` and skip
//! unchanged feeds.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FeedError, FeedResult};
use crate::fetcher::{FetchOutcome, SourceReport};

/// Validators a feed answered with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheValidators {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl CacheValidators {
    /// Whether there is anything to replay
    pub fn is_empty(&self) -> bool {
        self.etag.is_none() && self.last_modified.is_none()
    }

    /// Out-of-range spans saturate: huge ones never expire, hugely negative
    /// ones always do
    pub fn is_expired(&self, now: DateTime<Utc>, expire_hours: i64) -> bool {
        match Duration::try_hours(expire_hours) {
            Some(span) => now - self.fetched_at > span,
            None => expire_hours < 0,
        }
    }
}

/// URL → validators map persisted as a JSON file
#[derive(Debug, Clone)]
pub struct ValidatorCache {
    path: PathBuf,
    expire_hours: i64,
    entries: BTreeMap<String, CacheValidators>,
}

impl ValidatorCache {
    /// Empty cache that will be saved to `path`
    pub fn empty(path: impl Into<PathBuf>, expire_hours: i64) -> Self {
        Self {
            path: path.into(),
            expire_hours,
            entries: BTreeMap::new(),
        }
    }

    /// Load the cache file; a missing file yields an empty cache
    ///
    /// A file that exists but cannot be read or parsed is an error, so the
    /// caller can report it before starting over with [`ValidatorCache::empty`].
    pub fn load(path: impl AsRef<Path>, expire_hours: i64) -> FeedResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::empty(path, expire_hours));
        }

        let path_display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| FeedError::cache(&path_display, e))?;
        let entries: BTreeMap<String, CacheValidators> =
            serde_json::from_str(&content).map_err(|e| FeedError::cache(&path_display, e))?;

        debug!("Loaded {} cached validators from {}", entries.len(), path_display);
        Ok(Self {
            path: path.to_path_buf(),
            expire_hours,
            entries,
        })
    }

    /// Write the cache, creating parent directories as needed
    pub fn save(&self) -> FeedResult<()> {
        let display = self.path.display().to_string();
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| FeedError::cache(&display, e))?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries).map_err(|e| FeedError::cache(&display, e))?;
        fs::write(&self.path, json).map_err(|e| FeedError::cache(&display, e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validators to replay for `url`, unless expired
    pub fn validators_for(&self, url: &str, now: DateTime<Utc>) -> Option<&CacheValidators> {
        self.entries
            .get(url)
            .filter(|v| !v.is_empty() && !v.is_expired(now, self.expire_hours))
    }

    /// Remember validators for `url`; empty validators are ignored
    pub fn update(&mut self, url: &str, validators: CacheValidators) {
        if !validators.is_empty() {
            self.entries.insert(url.to_string(), validators);
        }
    }

    /// Merge validators learned by a fetch round
    pub fn absorb(&mut self, reports: &[SourceReport]) {
        for report in reports {
            if let FetchOutcome::Fetched { validators, .. } = &report.outcome {
                self.update(&report.url, validators.clone());
            }
        }
    }

    /// Drop expired entries
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let expire_hours = self.expire_hours;
        self.entries.retain(|_, v| !v.is_expired(now, expire_hours));
    }
}
