//! Bounded concurrent HTTP fetching with retry and backoff

use std::time::Duration;

use chrono::{DateTime, Utc};
use digest_core::{DigestConfig, HotboardSource};
use futures::stream::{self, StreamExt};
use reqwest::header::{HeaderName, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};

use crate::cache::{CacheValidators, ValidatorCache};
use crate::error::{FeedError, FeedResult};
use crate::sources::FeedSource;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; NewsDigest/1.0)";
const INITIAL_BACKOFF: Duration = Duration::from_millis(800);

/// Something with a label and a URL to fetch
pub trait FetchTarget {
    fn label(&self) -> &str;
    fn url(&self) -> &str;
}

impl FetchTarget for FeedSource {
    fn label(&self) -> &str {
        &self.name
    }

    fn url(&self) -> &str {
        &self.url
    }
}

impl FetchTarget for HotboardSource {
    fn label(&self) -> &str {
        &self.source
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// Result of fetching one URL
#[derive(Debug)]
pub enum FetchOutcome {
    /// Fresh body and the validators it came with
    Fetched {
        body: Vec<u8>,
        validators: CacheValidators,
    },
    /// Server confirmed the cached copy is current
    NotModified,
    /// Every attempt failed; holds the last error
    Failed(FeedError),
}

/// Outcome of one source in a fetch round
#[derive(Debug)]
pub struct SourceReport {
    pub name: String,
    pub url: String,
    pub outcome: FetchOutcome,
}

/// Fetcher settings
#[derive(Debug, Clone)]
pub struct FetcherOptions {
    /// Per-request timeout
    pub timeout: Duration,
    /// Extra attempts after the first failure
    pub retries: u32,
    /// Maximum requests in flight
    pub concurrency: usize,
    /// Proxy URL for all schemes, if any
    pub proxy: Option<String>,
}

impl Default for FetcherOptions {
    fn default() -> Self {
        Self::from(&DigestConfig::default())
    }
}

impl From<&DigestConfig> for FetcherOptions {
    fn from(config: &DigestConfig) -> Self {
        let proxy = config.proxy.trim();
        Self {
            timeout: Duration::from_secs(config.timeout),
            retries: config.retries,
            concurrency: config.concurrency,
            proxy: (!proxy.is_empty()).then(|| proxy.to_string()),
        }
    }
}

/// Doubled delay, pinned at the largest representable duration
fn next_backoff(delay: Duration) -> Duration {
    delay.saturating_mul(2)
}

/// HTTP fetcher shared by feeds and hot boards
pub struct FeedFetcher {
    client: Client,
    retries: u32,
    concurrency: usize,
    backoff: Duration,
}

impl FeedFetcher {
    /// Create a fetcher; fails only on an unusable proxy or TLS setup
    pub fn new(options: FetcherOptions) -> FeedResult<Self> {
        let mut builder = Client::builder()
            .timeout(options.timeout)
            .user_agent(USER_AGENT);

        // Only the configured proxy is used, never the environment's
        builder = match &options.proxy {
            Some(proxy) => {
                let proxy = reqwest::Proxy::all(proxy.as_str())
                    .map_err(|e| FeedError::InvalidConfig(format!("proxy {}: {}", proxy, e)))?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };

        let client = builder
            .build()
            .map_err(|e| FeedError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            retries: options.retries,
            concurrency: options.concurrency.max(1),
            backoff: INITIAL_BACKOFF,
        })
    }

    /// Override the first backoff delay
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Fetch one URL, replaying cached validators when given
    ///
    /// Retries `retries` times with a doubling backoff. A 304 answer is
    /// [`FetchOutcome::NotModified`]; it is never retried.
    pub async fn fetch(&self, url: &str, cached: Option<&CacheValidators>) -> FetchOutcome {
        let mut delay = self.backoff;
        let mut last_error = FeedError::RequestFailed(format!("No attempt made for {}", url));

        for attempt in 0..=self.retries {
            match self.fetch_once(url, cached).await {
                Ok(outcome) => return outcome,
                Err(e) => {
                    debug!("Fetch failed: {} ({}) attempt={}", url, e, attempt + 1);
                    last_error = e;
                }
            }

            if attempt < self.retries {
                tokio::time::sleep(delay).await;
                delay = next_backoff(delay);
            }
        }

        FetchOutcome::Failed(last_error)
    }

    async fn fetch_once(&self, url: &str, cached: Option<&CacheValidators>) -> FeedResult<FetchOutcome> {
        let mut request = self.client.get(url);
        if let Some(validators) = cached {
            if let Some(etag) = &validators.etag {
                request = request.header(IF_NONE_MATCH, etag.as_str());
            }
            if let Some(last_modified) = &validators.last_modified {
                request = request.header(IF_MODIFIED_SINCE, last_modified.as_str());
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| FeedError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_MODIFIED {
            return Ok(FetchOutcome::NotModified);
        }
        if !status.is_success() {
            return Err(FeedError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to fetch {}", url),
            });
        }

        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let validators = CacheValidators {
            etag: header(ETAG),
            last_modified: header(LAST_MODIFIED),
            fetched_at: Utc::now(),
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| FeedError::RequestFailed(e.to_string()))?;

        Ok(FetchOutcome::Fetched {
            body: body.to_vec(),
            validators,
        })
    }

    /// Fetch every target with at most `min(concurrency, N)` in flight
    ///
    /// Reports come back in target order. Validators are read from `cache`
    /// but never written here; merge them afterwards with
    /// [`ValidatorCache::absorb`].
    #[instrument(skip_all, fields(targets = targets.len()))]
    pub async fn fetch_all<T: FetchTarget>(
        &self,
        targets: &[T],
        cache: Option<&ValidatorCache>,
        now: DateTime<Utc>,
    ) -> Vec<SourceReport> {
        let limit = self.concurrency.min(targets.len()).max(1);

        let reports: Vec<SourceReport> = stream::iter(targets)
            .map(|target| async move {
                let cached = cache.and_then(|c| c.validators_for(target.url(), now));
                let outcome = self.fetch(target.url(), cached).await;
                match &outcome {
                    FetchOutcome::Fetched { body, .. } => {
                        debug!("{}: {} bytes", target.label(), body.len())
                    }
                    FetchOutcome::NotModified => debug!("{}: not modified", target.label()),
                    FetchOutcome::Failed(e) => warn!("Failed to fetch {}: {}", target.label(), e),
                }
                SourceReport {
                    name: target.label().to_string(),
                    url: target.url().to_string(),
                    outcome,
                }
            })
            .buffered(limit)
            .collect()
            .await;

        let fetched = reports
            .iter()
            .filter(|r| matches!(r.outcome, FetchOutcome::Fetched { .. }))
            .count();
        let cached = reports
            .iter()
            .filter(|r| matches!(r.outcome, FetchOutcome::NotModified))
            .count();
        info!(
            "Fetched {} sources: {} ok, {} cached, {} failed",
            reports.len(),
            fetched,
            cached,
            reports.len() - fetched - cached
        );
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(retries: u32) -> FeedFetcher {
        FeedFetcher::new(FetcherOptions {
            timeout: Duration::from_secs(2),
            retries,
            concurrency: 4,
            proxy: None,
        })
        .unwrap()
        .with_backoff(Duration::from_millis(1))
    }

    #[test]
    fn test_options_from_config() {
        let config = DigestConfig {
            proxy: "  ".to_string(),
            ..DigestConfig::default()
        };
        let options = FetcherOptions::from(&config);
        assert_eq!(options.timeout, Duration::from_secs(25));
        assert_eq!(options.retries, 2);
        assert!(options.proxy.is_none(), "Blank proxy should be ignored");
    }

    #[test]
    fn test_invalid_proxy_is_config_error() {
        let result = FeedFetcher::new(FetcherOptions {
            proxy: Some("http://[invalid".to_string()),
            ..FetcherOptions::default()
        });
        assert!(matches!(result, Err(FeedError::InvalidConfig(_))));
    }

    #[test]
    fn test_backoff_doubles_and_saturates() {
        assert_eq!(next_backoff(Duration::from_millis(800)), Duration::from_millis(1600));
        assert_eq!(next_backoff(Duration::MAX), Duration::MAX);

        let mut delay = INITIAL_BACKOFF;
        for _ in 0..128 {
            delay = next_backoff(delay);
        }
        assert_eq!(delay, Duration::MAX);
    }

    #[tokio::test]
    async fn test_invalid_url_fails_after_retries() {
        let outcome = fetcher(2).fetch("not a url", None).await;
        assert!(matches!(outcome, FetchOutcome::Failed(FeedError::RequestFailed(_))));
    }

    #[tokio::test]
    async fn test_fetch_all_keeps_target_order() {
        let targets = vec![
            FeedSource::new("first", "not a url"),
            FeedSource::new("second", "also not a url"),
            FeedSource::new("third", ""),
        ];
        let reports = fetcher(0).fetch_all(&targets, None, Utc::now()).await;
        let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_fetch_all_empty() {
        let targets: Vec<FeedSource> = Vec::new();
        assert!(fetcher(0).fetch_all(&targets, None, Utc::now()).await.is_empty());
    }
}
