//! Core types for the news digest
//!
//! This crate defines the shared data structures used across the digest,
//! including harvested records, story clusters and the configuration snapshot
//! every run is driven by.

pub mod cluster;
pub mod config;
pub mod error;
pub mod record;

pub use cluster::{Cluster, RankedCluster};
pub use config::{DigestConfig, HotboardFormat, HotboardSource};
pub use error::{DigestError, DigestResult};
pub use record::{Popularity, Record, Story};
