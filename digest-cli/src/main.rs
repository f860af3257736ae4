//! News digest command line
//!
//! Fetches RSS/Atom feeds or hot boards, runs them through the digest
//! engine and writes a markdown (or JSON) report.

mod cli;
mod render;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use digest_core::{DigestConfig, HotboardSource, Record};
use digest_engine::{DigestEngine, EngineConfig};
use digest_feeds::{
    parse_feed, parse_hotboard, FeedFetcher, FeedSource, FetchOutcome, FetcherOptions,
    ValidatorCache,
};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::{Cli, Command, HotArgs};
use crate::render::{render_digest, render_hot, BoardListing};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env: {}", e);
        }
    }

    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info,newsdigest=debug" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let config = cli.load_config()?;

    let report = match &cli.command {
        Command::Digest(_) => digest(&config, cli.json).await?,
        Command::Hot(args) => hot(&config, args, cli.json).await?,
    };

    write_report(cli.output.as_deref(), &report)
}

async fn digest(config: &DigestConfig, json: bool) -> Result<String> {
    let now = Utc::now();
    let sources = FeedSource::from_table(&config.sources);
    info!("Fetching {} feeds", sources.len());

    let mut cache = open_cache(config);

    let fetcher = FeedFetcher::new(FetcherOptions::from(config))?;
    let reports = fetcher.fetch_all(&sources, cache.as_ref(), now).await;

    let mut records: Vec<Record> = Vec::new();
    for (source, report) in sources.iter().zip(&reports) {
        if let FetchOutcome::Fetched { body, .. } = &report.outcome {
            match parse_feed(body, source) {
                Ok(parsed) => {
                    debug!("{}: {} records", source.name, parsed.len());
                    records.extend(parsed);
                }
                Err(e) => warn!("{}: {}", source.name, e),
            }
        }
    }
    info!("Harvested {} records", records.len());

    if let Some(cache) = cache.as_mut() {
        cache.absorb(&reports);
        cache.prune(now);
        if let Err(e) = cache.save() {
            warn!("Failed to save validator cache: {}", e);
        }
    }

    let engine = DigestEngine::new(EngineConfig::from(config));
    let outcome = engine.run_digest(records, now);
    info!(
        "Digest: {} stories from {} primary / {} fallback candidates",
        outcome.stories.len(),
        outcome.primary_count,
        outcome.fallback_count
    );

    if json {
        return serde_json::to_string_pretty(&outcome).context("Failed to serialize digest");
    }
    Ok(render_digest(
        &outcome,
        &engine.config().hot_keywords,
        (config.hours, config.fallback_hours),
        now,
    ))
}

/// Validator cache named by the config, `None` when the path is blank
fn open_cache(config: &DigestConfig) -> Option<ValidatorCache> {
    let path = config.cache_path.trim();
    if path.is_empty() {
        debug!("Validator cache disabled");
        return None;
    }

    let cache = ValidatorCache::load(path, config.cache_expire_hours).unwrap_or_else(|e| {
        warn!("Ignoring validator cache: {}", e);
        ValidatorCache::empty(path, config.cache_expire_hours)
    });
    Some(cache)
}

async fn hot(config: &DigestConfig, args: &HotArgs, json: bool) -> Result<String> {
    let now = Utc::now();

    let boards = match &args.input {
        Some(path) => boards_from_file(path)?,
        None => fetch_boards(config, now).await?,
    };

    let records: Vec<Record> = boards
        .iter()
        .filter_map(|board| board.records.clone())
        .flatten()
        .collect();
    info!("Clustering {} hot-board records", records.len());

    let engine = DigestEngine::new(EngineConfig::from(config));
    let clusters = engine.run_hot(records);

    if json {
        return serde_json::to_string_pretty(&clusters).context("Failed to serialize clusters");
    }
    Ok(render_hot(&clusters, &boards, now))
}

async fn fetch_boards(config: &DigestConfig, now: chrono::DateTime<Utc>) -> Result<Vec<BoardListing>> {
    let keyed: Vec<Option<HotboardSource>> = config.hotboards.iter().map(keyed_board).collect();
    let ready: Vec<HotboardSource> = keyed.iter().flatten().cloned().collect();

    let fetcher = FeedFetcher::new(FetcherOptions::from(config))?;
    let mut reports = fetcher.fetch_all(&ready, None, now).await.into_iter();

    let boards = config
        .hotboards
        .iter()
        .zip(keyed)
        .map(|(board, keyed)| {
            let report = keyed.and_then(|_| reports.next());
            let records = match report.map(|r| r.outcome) {
                Some(FetchOutcome::Fetched { body, .. }) => {
                    match parse_hotboard(&body, board.format, &board.source, config.hotboard_limit) {
                        Ok(records) => Some(records),
                        Err(e) => {
                            warn!("{}: {}", board.name, e);
                            None
                        }
                    }
                }
                _ => None,
            };
            BoardListing {
                name: board.name.clone(),
                records,
            }
        })
        .collect();
    Ok(boards)
}

/// Board ready to fetch, with its API key filled in from the environment
///
/// Keyed boards whose variable is unset or blank are skipped.
fn keyed_board(board: &HotboardSource) -> Option<HotboardSource> {
    let Some(var) = &board.key_env else {
        return Some(board.clone());
    };
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Some(board.with_key(key.trim())),
        _ => {
            warn!("{}: {} is not set, skipping", board.name, var);
            None
        }
    }
}

/// Records from a JSON array, listed per source in first-seen order
fn boards_from_file(path: &Path) -> Result<Vec<BoardListing>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records: Vec<Record> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse records in {}", path.display()))?;

    let mut boards: Vec<BoardListing> = Vec::new();
    for record in records {
        match boards.iter().position(|b| b.name == record.source) {
            Some(idx) => boards[idx].records.get_or_insert_with(Vec::new).push(record),
            None => boards.push(BoardListing {
                name: record.source.clone(),
                records: Some(vec![record]),
            }),
        }
    }
    Ok(boards)
}

fn write_report(output: Option<&Path>, report: &str) -> Result<()> {
    let Some(path) = output else {
        println!("{}", report);
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, report).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Report written to {}", path.display());
    Ok(())
}
