//! Collaborators that harvest records for the digest engine
//!
//! This crate provides:
//! - A bounded concurrent fetcher with timeout, retry and backoff
//! - A conditional-GET validator cache persisted as JSON
//! - RSS/Atom feed parsing into records
//! - Hot-board JSON parsing into ranked records

pub mod cache;
pub mod error;
pub mod fetcher;
pub mod hotboard;
pub mod rss_parser;
pub mod sources;

pub use cache::{CacheValidators, ValidatorCache};
pub use error::{FeedError, FeedResult};
pub use fetcher::{FeedFetcher, FetchOutcome, FetchTarget, FetcherOptions, SourceReport};
pub use hotboard::parse_hotboard;
pub use rss_parser::{parse_feed, strip_html, unescape_html};
pub use sources::{curated_sources, FeedSource};
