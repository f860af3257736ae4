//! Deduplication and ranking engine for harvested news records
//!
//! Everything in this crate is synchronous, pure and order-sensitive: the
//! first record seen wins a duplicate, the first matching cluster wins a
//! record. Callers fetch and parse records elsewhere, then hand a finished
//! collection to [`DigestEngine`].
//!
//! ## Pipelines
//! - Feed digest: time-window filter, near-duplicate suppression, per-item
//!   scoring, ranking
//! - Hot boards: greedy clustering across sources, per-cluster scoring,
//!   ranking

pub mod canonical;
pub mod cluster;
pub mod engine;
pub mod keywords;
pub mod popularity;
pub mod rank;
pub mod scoring;
pub mod similarity;
pub mod suppress;
pub mod timestamp;
pub mod window;

pub use canonical::canonicalize;
pub use cluster::{best_member, build_clusters, summarize_cluster};
pub use engine::{DigestEngine, DigestOutcome, EngineConfig};
pub use keywords::Keywords;
pub use popularity::{parse_popularity, popularity_value};
pub use rank::{rank_and_select, Rankable};
pub use scoring::{is_hot, recency_bonus, score_cluster, score_story};
pub use similarity::{jaccard, normalize_title, title_similarity, tokenize, Stopwords, TokenSet};
pub use suppress::suppress_duplicates;
pub use timestamp::parse_timestamp;
pub use window::{filter_window, window_start, Window, WindowBuckets, WindowPolicy};
