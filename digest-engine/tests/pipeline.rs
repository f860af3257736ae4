//! End-to-end behaviour of the digest and hot-board pipelines
//!
//! Run with: cargo test -p digest-engine --test pipeline

use chrono::{Duration, Utc};
use digest_core::{DigestConfig, Record, Story};
use digest_engine::{
    filter_window, rank_and_select, suppress_duplicates, title_similarity, DigestEngine,
    EngineConfig, Keywords, Stopwords, Window, WindowPolicy,
};

fn policy(include: &[&str], exclude: &[&str]) -> WindowPolicy {
    WindowPolicy {
        primary_hours: 24,
        fallback_hours: 48,
        include: Keywords::new(include),
        exclude: Keywords::new(exclude),
    }
}

fn engine_with(config: DigestConfig) -> DigestEngine {
    DigestEngine::new(EngineConfig::from(&config))
}

#[test]
fn test_scenario_include_filter() {
    let now = Utc::now();
    let stamp = now.to_rfc3339();
    let records = vec![
        Record::new("AI news", "feed").with_link("https://a.com/1").published(&stamp),
        Record::new("Sports news", "feed").with_link("https://a.com/2").published(&stamp),
    ];

    let buckets = filter_window(records, now, &policy(&["AI"], &[]));
    let titles: Vec<&str> = buckets.primary.iter().map(Story::title).collect();
    assert_eq!(titles, vec!["AI news"]);
}

#[test]
fn test_scenario_exclude_filter() {
    let now = Utc::now();
    let stamp = now.to_rfc3339();
    let records = vec![
        Record::new("AI 融资新闻", "feed").published(&stamp),
        Record::new("AI 技术突破", "feed").published(&stamp),
    ];

    let buckets = filter_window(records, now, &policy(&["AI"], &["融资"]));
    let titles: Vec<&str> = buckets.primary.iter().map(Story::title).collect();
    assert_eq!(titles, vec!["AI 技术突破"]);
}

#[test]
fn test_scenario_link_dedup() {
    let stories: Vec<Story> = vec![
        Record::new("Breaking News Today", "feed").with_link("https://a.com/1"),
        Record::new("Different Story Here", "feed").with_link("https://a.com/1"),
        Record::new("Unique Article Content", "feed").with_link("https://a.com/2"),
    ]
    .into_iter()
    .map(Story::from)
    .collect();

    let kept = suppress_duplicates(stories, 0.7, &Stopwords::standard());
    assert_eq!(kept.len(), 2);
}

#[test]
fn test_scenario_containment_dedup() {
    let stories: Vec<Story> = vec![
        Record::new("OpenAI releases GPT-5 model", "feed").with_link("https://a.com/gpt5"),
        Record::new("OpenAI releases GPT-5 model today", "feed").with_link("https://b.com/gpt5"),
        Record::new("Google announces new AI", "feed").with_link("https://c.com/google"),
    ]
    .into_iter()
    .map(Story::from)
    .collect();

    let kept = suppress_duplicates(stories, 0.7, &Stopwords::standard());
    let titles: Vec<&str> = kept.iter().map(Story::title).collect();
    assert_eq!(titles, vec!["OpenAI releases GPT-5 model", "Google announces new AI"]);
}

#[test]
fn test_include_keyword_in_description_only() {
    let now = Utc::now();
    let records = vec![Record::new("Weekly roundup", "feed")
        .with_description("New LLM benchmarks")
        .published(&now.to_rfc3339())];

    let buckets = filter_window(records, now, &policy(&["LLM"], &[]));
    assert_eq!(buckets.primary.len(), 1);
    assert_eq!(buckets.unmatched, 0);
}

#[test]
fn test_empty_include_list_drops_everything() {
    let now = Utc::now();
    let config = DigestConfig {
        include_keywords: Vec::new(),
        exclude_keywords: Vec::new(),
        ..DigestConfig::default()
    };
    let records = vec![Record::new("Anything", "feed").published(&now.to_rfc3339())];

    let outcome = engine_with(config).run_digest(records, now);
    assert!(outcome.stories.is_empty());
    assert_eq!(outcome.unmatched, 1);
}

#[test]
fn test_digest_survives_oversized_fallback_window() {
    let now = Utc::now();
    let config = DigestConfig {
        hours: 1,
        fallback_hours: 3_000_000_000,
        include_keywords: vec!["AI".to_string()],
        ..DigestConfig::default()
    };
    let records = vec![Record::new("AI from last week", "feed")
        .with_link("https://a.com/old")
        .published(&(now - Duration::days(7)).to_rfc3339())];

    let outcome = engine_with(config).run_digest(records, now);
    assert_eq!(outcome.window, Window::Fallback);
    assert_eq!(outcome.stories.len(), 1);
}

#[test]
fn test_identity_similarity() {
    let stopwords = Stopwords::standard();
    for title in ["AI news", "某明星官宣结婚", "GPT-5 发布", "x"] {
        assert_eq!(title_similarity(title, title, &stopwords), 1.0, "Identity failed for {:?}", title);
    }
}

#[test]
fn test_digest_drops_near_duplicates_and_ranks() {
    let now = Utc::now();
    let config = DigestConfig {
        include_keywords: vec!["rust".into(), "openai".into(), "kernel".into()],
        exclude_keywords: Vec::new(),
        hot_keywords: vec!["GPT".to_string()],
        max_items: 2,
        ..DigestConfig::default()
    };

    let fresh = now.to_rfc3339();
    let stale = (now - Duration::hours(20)).to_rfc3339();
    let records = vec![
        Record::new("Weekly Rust roundup", "feed").with_link("https://r.com/1").published(&stale),
        Record::new("OpenAI ships GPT-5", "feed").with_link("https://o.com/1").published(&fresh),
        Record::new("OpenAI ships GPT-5 today", "other").with_link("https://o.com/2").published(&fresh),
        Record::new("Kernel release notes", "feed").with_link("https://k.com/1").published(&fresh),
    ];

    let outcome = engine_with(config).run_digest(records, now);
    assert_eq!(outcome.window, Window::Primary);
    assert_eq!(outcome.suppressed, 1);

    let titles: Vec<&str> = outcome.stories.iter().map(Story::title).collect();
    assert_eq!(titles, vec!["OpenAI ships GPT-5", "Kernel release notes"]);
}

#[test]
fn test_digest_empty_when_nothing_dated() {
    let config = DigestConfig {
        include_keywords: vec!["story".to_string()],
        ..DigestConfig::default()
    };
    let records = vec![Record::new("Undated story", "feed")];
    let outcome = engine_with(config).run_digest(records, Utc::now());
    assert!(outcome.stories.is_empty());
    assert_eq!(outcome.undated, 1);
}

#[test]
fn test_digest_falls_back_and_reports_window() {
    let config = DigestConfig {
        include_keywords: vec!["launch".to_string()],
        ..DigestConfig::default()
    };
    let now = Utc::now();
    let stamp = (now - Duration::hours(30)).to_rfc3339();
    let records = vec![Record::new("Yesterday's launch", "feed")
        .with_link("https://a.com/launch")
        .published(&stamp)];

    let outcome = engine_with(config).run_digest(records, now);
    assert_eq!(outcome.window, Window::Fallback);
    assert_eq!(outcome.primary_count, 0);
    assert_eq!(outcome.fallback_count, 1);

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["window"], "fallback");
    assert_eq!(json["stories"].as_array().map(Vec::len), Some(1));
}

#[test]
fn test_hot_corroborated_cluster_outranks_single_source() {
    let records = vec![
        Record::new("顶流歌手演唱会门票秒空", "微博").with_rank(1).with_popularity("1亿"),
        Record::new("某地发布暴雨预警", "微博").with_rank(19),
        Record::new("某地发布暴雨预警 提醒市民", "百度").with_rank(20),
    ];

    let ranked = engine_with(DigestConfig::default()).run_hot(records);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].representative_title, "某地发布暴雨预警");
    assert_eq!(ranked[0].platform_count, 2);
    assert!(ranked[0].score > ranked[1].score);
}

#[test]
fn test_hot_clustering_is_order_sensitive() {
    let a = Record::new("alpha beta", "微博");
    let b = Record::new("beta gamma", "百度");
    let c = Record::new("alpha beta gamma", "知乎");
    let engine = engine_with(DigestConfig::default());

    let forward = engine.run_hot(vec![a.clone(), b.clone(), c.clone()]);
    let reordered = engine.run_hot(vec![b, a, c]);

    let anchor = |clusters: &[digest_core::RankedCluster], member_count: usize| {
        clusters
            .iter()
            .find(|c| c.member_count == member_count)
            .map(|c| c.representative_title.clone())
    };
    assert_eq!(anchor(&forward, 2).as_deref(), Some("alpha beta"));
    assert_eq!(anchor(&reordered, 2).as_deref(), Some("beta gamma"));
}

#[test]
fn test_hot_max_items() {
    let config = DigestConfig {
        max_items: 1,
        ..DigestConfig::default()
    };
    let records = vec![
        Record::new("first topic", "微博").with_rank(1),
        Record::new("completely unrelated", "百度").with_rank(1),
    ];
    assert_eq!(engine_with(config).run_hot(records).len(), 1);
}

#[test]
fn test_rank_and_select_on_clusters() {
    let engine = engine_with(DigestConfig {
        max_items: 0,
        ..DigestConfig::default()
    });
    let records = vec![
        Record::new("low ranked", "微博").with_rank(20),
        Record::new("top ranked", "百度").with_rank(1),
    ];
    let ranked = rank_and_select(engine.run_hot(records), 0);
    assert_eq!(ranked[0].title, "top ranked");
}
