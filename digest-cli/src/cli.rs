//! Command line arguments and how they override the configuration file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use digest_core::DigestConfig;

#[derive(Debug, Parser)]
#[command(name = "newsdigest", version, about = "Deduplicated, ranked news digests")]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, env = "DIGEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(short, long, global = true, env = "DIGEST_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Emit JSON instead of markdown
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Maximum entries in the report (0 for all)
    #[arg(long, global = true)]
    pub max_items: Option<i64>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Proxy for all requests, e.g. http://proxy:8080
    #[arg(long, global = true, env = "RSS_PROXY")]
    pub proxy: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch feeds and build the daily digest
    Digest(DigestArgs),
    /// Cluster hot boards across platforms
    Hot(HotArgs),
}

#[derive(Debug, Args)]
pub struct DigestArgs {
    /// Primary time window in hours
    #[arg(long)]
    pub hours: Option<i64>,

    /// Window used when the primary one is empty
    #[arg(long)]
    pub fallback_hours: Option<i64>,

    /// Validator cache file
    #[arg(long, env = "RSS_CACHE_PATH")]
    pub cache_path: Option<String>,
}

#[derive(Debug, Args)]
pub struct HotArgs {
    /// Read records from a JSON array instead of fetching hot boards
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Entries read from each hot board
    #[arg(long)]
    pub limit: Option<usize>,
}

impl Cli {
    /// Load the configuration file, if any, and apply flag overrides
    pub fn load_config(&self) -> Result<DigestConfig> {
        let mut config = match &self.config {
            Some(path) => DigestConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => DigestConfig::default(),
        };
        self.apply(&mut config);
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    fn apply(&self, config: &mut DigestConfig) {
        if let Some(max_items) = self.max_items {
            config.max_items = max_items;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(proxy) = &self.proxy {
            config.proxy = proxy.clone();
        }

        match &self.command {
            Command::Digest(args) => {
                if let Some(hours) = args.hours {
                    config.hours = hours;
                }
                if let Some(fallback_hours) = args.fallback_hours {
                    config.fallback_hours = fallback_hours;
                }
                if let Some(cache_path) = args.cache_path.as_deref().filter(|p| !p.is_empty()) {
                    config.cache_path = cache_path.to_string();
                }
            }
            Command::Hot(args) => {
                if let Some(limit) = args.limit {
                    config.hotboard_limit = limit;
                }
            }
        }
    }
}
