//! Configuration snapshot for a digest run
//!
//! Every field has a default, so a JSON file only needs to name what it
//! overrides. Defaults are built fresh on every call; nothing here is shared
//! mutable state.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{DigestError, DigestResult};

/// JSON shape served by a hot-board provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotboardFormat {
    /// `{"list": [{"title", "hot_value", "url"}]}`
    #[default]
    Uapi,
    /// `{"code", "msg", "result": {"list": [{"word"}]}}`
    Tianapi,
    /// `{"code", "msg", "data": [{"name", "viewnum", "url", "rank"}]}`
    Itapi,
}

/// A hot-board endpoint returning a ranked JSON list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotboardSource {
    /// Display name of the board (e.g. "微博热搜")
    pub name: String,
    /// Source label attached to every record of the board
    pub source: String,
    /// Endpoint URL, without the API key
    pub url: String,
    #[serde(default)]
    pub format: HotboardFormat,
    /// Environment variable holding the API key, for keyed providers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_env: Option<String>,
}

impl HotboardSource {
    pub fn new(name: &str, source: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            source: source.to_string(),
            url: url.to_string(),
            format: HotboardFormat::default(),
            key_env: None,
        }
    }

    /// Served in `format`, authenticated by the key in `key_env`
    pub fn keyed(mut self, format: HotboardFormat, key_env: &str) -> Self {
        self.format = format;
        self.key_env = Some(key_env.to_string());
        self
    }

    /// Copy of the board with `key` appended as the `key` query parameter
    pub fn with_key(&self, key: &str) -> Self {
        let separator = if self.url.contains('?') { '&' } else { '?' };
        Self {
            url: format!("{}{}key={}", self.url, separator, key),
            ..self.clone()
        }
    }
}

/// Configuration for a digest run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Primary time window (hours)
    pub hours: i64,
    /// Wider window used only when the primary one is empty (hours)
    pub fallback_hours: i64,
    /// Maximum number of output entries, zero or less disables truncation
    pub max_items: i64,
    /// Per-request timeout (seconds)
    pub timeout: u64,
    /// Extra attempts after a failed request
    pub retries: u32,
    /// Cap on concurrent source requests
    pub concurrency: usize,
    /// Feed name -> feed URL, in fetch order
    pub sources: IndexMap<String, String>,
    /// Hot-board endpoints, in fetch order
    pub hotboards: Vec<HotboardSource>,
    /// Entries read from each hot board
    pub hotboard_limit: usize,
    pub include_keywords: Vec<String>,
    pub exclude_keywords: Vec<String>,
    pub hot_keywords: Vec<String>,
    /// Authority of feed sources, default 1.0
    pub source_weights: IndexMap<String, f64>,
    /// Rank multiplier of hot-board sources, default 1.0
    pub platform_weights: IndexMap<String, f64>,
    pub stopwords: Vec<String>,
    /// Title similarity at which two feed items are duplicates
    pub similarity_threshold: f64,
    /// Title similarity at which a hot-board entry joins a cluster
    pub cluster_threshold: f64,
    /// Validator cache file, empty disables the cache
    pub cache_path: String,
    /// Validators older than this are not replayed (hours)
    pub cache_expire_hours: i64,
    /// HTTP(S) proxy, empty for none
    pub proxy: String,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            hours: 24,
            fallback_hours: 48,
            max_items: 10,
            timeout: 25,
            retries: 2,
            concurrency: 8,
            sources: default_sources(),
            hotboards: default_hotboards(),
            hotboard_limit: 20,
            include_keywords: default_include_keywords(),
            exclude_keywords: default_exclude_keywords(),
            hot_keywords: default_hot_keywords(),
            source_weights: default_source_weights(),
            platform_weights: default_platform_weights(),
            stopwords: default_stopwords(),
            similarity_threshold: 0.7,
            cluster_threshold: 0.6,
            cache_path: "/tmp/rss-cache.json".to_string(),
            cache_expire_hours: 48,
            proxy: String::new(),
        }
    }
}

impl DigestConfig {
    /// Load a JSON configuration file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> DigestResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| DigestError::io(path.display().to_string(), e))?;
        let config: DigestConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the pipeline relies on
    pub fn validate(&self) -> DigestResult<()> {
        if self.hours <= 0 {
            return Err(DigestError::config(format!(
                "hours must be positive (got {})",
                self.hours
            )));
        }
        if self.fallback_hours <= self.hours {
            return Err(DigestError::config(format!(
                "fallback_hours ({}) must exceed hours ({})",
                self.fallback_hours, self.hours
            )));
        }
        for (name, value) in [
            ("similarity_threshold", self.similarity_threshold),
            ("cluster_threshold", self.cluster_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(DigestError::config(format!(
                    "{} must be within [0, 1] (got {})",
                    name, value
                )));
            }
        }
        if self.concurrency == 0 {
            return Err(DigestError::config("concurrency must be at least 1"));
        }
        Ok(())
    }
}

/// Curated feeds for the AI digest
pub fn default_sources() -> IndexMap<String, String> {
    [
        ("OpenAI", "https://openai.com/blog/rss.xml"),
        ("Google DeepMind", "https://deepmind.google/blog/rss.xml"),
        ("GitHub Blog", "https://github.blog/feed/"),
        ("Hugging Face", "https://huggingface.co/blog/feed.xml"),
        (
            "arXiv AI",
            "http://export.arxiv.org/api/query?search_query=cat:cs.AI&sortBy=submittedDate&sortOrder=descending&max_results=15",
        ),
        (
            "arXiv ML",
            "http://export.arxiv.org/api/query?search_query=cat:cs.LG&sortBy=submittedDate&sortOrder=descending&max_results=10",
        ),
        (
            "arXiv CV",
            "http://export.arxiv.org/api/query?search_query=cat:cs.CV&sortBy=submittedDate&sortOrder=descending&max_results=10",
        ),
        (
            "arXiv CL",
            "http://export.arxiv.org/api/query?search_query=cat:cs.CL&sortBy=submittedDate&sortOrder=descending&max_results=10",
        ),
        (
            "TechCrunch AI",
            "https://techcrunch.com/category/artificial-intelligence/feed/",
        ),
        ("机器之心", "https://www.jiqizhixin.com/rss"),
        ("Hacker News", "https://news.ycombinator.com/rss"),
        ("36氪", "https://36kr.com/feed"),
        ("虎嗅", "https://www.huxiu.com/rss/0.xml"),
        ("IT之家", "https://www.ithome.com/rss/"),
        ("少数派", "https://sspai.com/feed"),
        ("爱范儿", "https://www.ifanr.com/feed"),
    ]
    .into_iter()
    .map(|(name, url)| (name.to_string(), url.to_string()))
    .collect()
}

/// Public hot boards plus the keyed WeChat and Xiaohongshu providers
pub fn default_hotboards() -> Vec<HotboardSource> {
    const BASE: &str = "https://uapis.cn/api/v1/misc/hotboard";
    let mut boards: Vec<HotboardSource> = [
        ("weibo", "微博热搜", "微博"),
        ("baidu", "百度热搜", "百度"),
        ("zhihu", "知乎热榜", "知乎"),
        ("bilibili", "B站热榜", "B站"),
        ("douyin", "抖音热点", "抖音"),
        ("toutiao", "今日头条", "今日头条"),
    ]
    .into_iter()
    .map(|(kind, name, source)| {
        HotboardSource::new(name, source, &format!("{}?type={}", BASE, kind))
    })
    .collect();

    boards.push(
        HotboardSource::new("微信热搜", "微信", "https://apis.tianapi.com/wxhottopic/index")
            .keyed(HotboardFormat::Tianapi, "TIANAPI_KEY"),
    );
    boards.push(
        HotboardSource::new("小红书热点", "小红书", "https://api.itapi.cn/api/hotnews/xiaohongshu")
            .keyed(HotboardFormat::Itapi, "ITAPI_KEY"),
    );
    boards
}

pub fn default_include_keywords() -> Vec<String> {
    to_strings(&[
        "AI", "LLM", "大模型", "多模态", "multimodal", "智能体", "agent",
        "machine learning", "deep learning", "transformer", "attention", "diffusion",
        "端侧", "on-device", "edge AI", "programming", "copilot", "assistant",
        "RAG", "retrieval", "embedding", "向量数据库", "fine-tuning", "prompt engineering",
        "vision", "speech", "VLM", "VLA", "ASR", "TTS", "reinforcement learning",
        "Claude", "GPT", "Gemini", "Llama", "Qwen", "通义", "幻觉", "alignment",
        "autonomous", "robotics",
    ])
}

pub fn default_exclude_keywords() -> Vec<String> {
    to_strings(&[
        "融资", "IPO", "投资", "收购", "merger",
        "招聘", "求职", "面试",
        "峰会", "会议", "活动", "Meetup",
        "Super Bowl", "NFL", "体育",
        "娱乐", "八卦", "明星", "politics", "政治", "crypto", "加密货币",
        "gaming", "游戏", "celebrity",
    ])
}

pub fn default_hot_keywords() -> Vec<String> {
    to_strings(&[
        "Claude", "GPT-5", "GPT-4.5", "OpenAI", "Anthropic", "Gemini",
        "发布", "launch", "release", "announce",
        "开源", "open source", "突破", "breakthrough", "SOTA",
        "vulnerability", "安全漏洞",
    ])
}

pub fn default_source_weights() -> IndexMap<String, f64> {
    to_weights(&[
        ("OpenAI", 3.0),
        ("Anthropic", 3.0),
        ("Google DeepMind", 2.5),
        ("Hugging Face", 2.0),
        ("GitHub Blog", 1.6),
        ("arXiv AI", 1.4),
        ("arXiv ML", 1.4),
        ("arXiv CV", 1.4),
        ("arXiv CL", 1.4),
        ("TechCrunch AI", 1.2),
        ("机器之心", 1.2),
        ("Hacker News", 1.0),
        ("36氪", 1.0),
        ("虎嗅", 1.0),
        ("IT之家", 0.8),
        ("少数派", 0.8),
        ("爱范儿", 0.8),
    ])
}

pub fn default_platform_weights() -> IndexMap<String, f64> {
    to_weights(&[
        ("微博", 1.0),
        ("百度", 1.0),
        ("知乎", 0.9),
        ("B站", 0.8),
        ("抖音", 1.0),
        ("今日头条", 0.9),
        ("微信", 1.2),
        ("小红书", 0.9),
    ])
}

/// Function words, numerals, measure words and demonstratives
pub fn default_stopwords() -> Vec<String> {
    const TABLE: &str = "的了是在有和与或等这那我你他她它们着过被把给向从到为以及其之\
        上下中内外前后左右一二三四五六七八九十百千万亿个只条件次名位种类样些多少\
        大小长短高低快慢新老好坏对错真假能会要可应该须必需将已正再也就才都又还更\
        最很太实际现当因所而但却仅曾常总全每各某任何谁哪什么怎几久远近此彼凡诸众\
        群若如似像同异比较极甚颇稍略";
    let mut words: Vec<String> = Vec::new();
    for c in TABLE.chars() {
        let word = c.to_string();
        if !words.contains(&word) {
            words.push(word);
        }
    }
    words
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|s| s.to_string()).collect()
}

fn to_weights(pairs: &[(&str, f64)]) -> IndexMap<String, f64> {
    pairs
        .iter()
        .map(|(name, weight)| (name.to_string(), *weight))
        .collect()
}
