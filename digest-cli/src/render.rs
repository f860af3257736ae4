//! Markdown reports

use chrono::{DateTime, Local, Utc};
use digest_core::{Popularity, RankedCluster, Record, Story};
use digest_engine::{is_hot, DigestOutcome, Keywords, Window};

const EMPTY_DIGEST: &str = "⚠️ 暂无符合条件的资讯";
const HOT_DESCRIPTION_CHARS: usize = 100;
const TOP_TITLE_CHARS: usize = 30;
const BOARD_TITLE_CHARS: usize = 25;

/// A hot board as fetched, for the per-platform listing
#[derive(Debug, Clone)]
pub struct BoardListing {
    pub name: String,
    /// `None` when the board could not be fetched
    pub records: Option<Vec<Record>>,
}

/// Daily digest: hot stories first, then the rest
pub fn render_digest(
    outcome: &DigestOutcome,
    hot_keywords: &Keywords,
    hours: (i64, i64),
    now: DateTime<Utc>,
) -> String {
    let (primary_hours, fallback_hours) = hours;
    let window = match outcome.window {
        Window::Primary => format!("过去 {} 小时", primary_hours),
        Window::Fallback => format!("过去 {} 小时（{} 小时内无结果）", fallback_hours, primary_hours),
    };

    let mut sources: Vec<&str> = outcome.stories.iter().map(Story::source).collect();
    sources.sort_unstable();
    sources.dedup();
    let sources = if sources.is_empty() {
        "RSS 聚合".to_string()
    } else {
        sources.join(", ")
    };

    let mut md = format!(
        "# 🚨 AI 精选日报\n\n**生成时间**: {}  \n**时间范围**: {}  \n**数据源**: {}\n\n---\n\n",
        local(now, "%Y-%m-%d %H:%M"),
        window,
        sources
    );

    if outcome.stories.is_empty() {
        md.push_str(EMPTY_DIGEST);
        md.push('\n');
        return md;
    }

    let (hot, normal): (Vec<&Story>, Vec<&Story>) = outcome
        .stories
        .iter()
        .partition(|story| is_hot(story.title(), hot_keywords));

    if !hot.is_empty() {
        md.push_str("## 🔥 重点速递\n\n");
        for (i, story) in hot.iter().enumerate() {
            md.push_str(&format!("**{}. {}**\n", i + 1, story.title()));
            if let Some(time) = story.parsed_time {
                md.push_str(&format!("- ⏰ {}\n", local(time, "%m-%d %H:%M")));
            }
            md.push_str(&format!("- 📰 {}\n", story.source()));
            md.push_str(&format!("- 🔗 [原文链接]({})\n", story.record.link_str()));
            if story.record.has_description() {
                let description = truncate(story.record.description_str().trim(), HOT_DESCRIPTION_CHARS);
                md.push_str(&format!("- 💬 {}...\n", description));
            }
            md.push('\n');
        }
    }

    if !normal.is_empty() {
        md.push_str("## 📊 技术动态\n\n");
        for (i, story) in normal.iter().enumerate() {
            md.push_str(&format!("{}. [{}]({})\n", i + 1, story.title(), story.record.link_str()));
            if let Some(time) = story.parsed_time {
                md.push_str(&format!("   - ⏰ {}\n", local(time, "%m-%d %H:%M")));
            }
            md.push_str(&format!("   - {}\n\n", story.source()));
        }
    }

    md.push_str(&format!(
        "---\n\n**统计**: 🔥 {} + 📊 {} | 去重 {}\n",
        hot.len(),
        normal.len(),
        outcome.suppressed
    ));
    md
}

/// Cross-platform hot report: top clusters, then each board's own list
pub fn render_hot(clusters: &[RankedCluster], boards: &[BoardListing], now: DateTime<Utc>) -> String {
    let mut lines = vec![
        "# 📱 热搜速递".to_string(),
        String::new(),
        format!("⏰ {}", local(now, "%Y-%m-%d %H:%M")),
        String::new(),
        "---".to_string(),
        String::new(),
        format!("## 🔥 TOP {} 热点", clusters.len()),
        String::new(),
    ];

    if clusters.is_empty() {
        lines.push("暂无数据".to_string());
        lines.push(String::new());
    }
    for (i, cluster) in clusters.iter().enumerate() {
        lines.push(format!("**{}. {}**", i + 1, ellipsize(&cluster.title, TOP_TITLE_CHARS)));

        let mut info = Vec::new();
        if let Some(heat) = cluster.popularity.as_ref().map(popularity_text).filter(|h| !h.is_empty()) {
            info.push(format!("🔥{}", heat));
        }
        if cluster.platform_count > 1 {
            info.push(format!("[{}平台]", cluster.platform_count));
        }
        if !info.is_empty() {
            lines.push(format!("   {}", info.join(" ")));
        }
        if let Some(url) = &cluster.url {
            lines.push(format!("   [查看详情]({})", url));
        }
        lines.push(String::new());
    }

    if !boards.is_empty() {
        lines.push("---".to_string());
        lines.push(String::new());
        lines.push("## 📋 各平台热搜".to_string());
        lines.push(String::new());

        for board in boards {
            lines.push(format!("**{}**", board.name));
            match &board.records {
                None => lines.push("❌ 获取失败".to_string()),
                Some(records) if records.is_empty() => lines.push("暂无数据".to_string()),
                Some(records) => {
                    for (i, record) in records.iter().enumerate() {
                        let title = ellipsize(&record.title, BOARD_TITLE_CHARS);
                        match record.popularity.as_ref().map(popularity_text).filter(|h| !h.is_empty()) {
                            Some(heat) => lines.push(format!("{}. {} 🔥{}", i + 1, title, heat)),
                            None => lines.push(format!("{}. {}", i + 1, title)),
                        }
                    }
                }
            }
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

fn popularity_text(popularity: &Popularity) -> String {
    match popularity {
        Popularity::Count(value) => format!("{}", value),
        Popularity::Text(text) => text.trim().to_string(),
    }
}

fn local(time: DateTime<Utc>, format: &str) -> String {
    time.with_timezone(&Local).format(format).to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn ellipsize(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", truncate(text, max_chars))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(stories: Vec<Story>) -> DigestOutcome {
        DigestOutcome {
            window: Window::Primary,
            primary_count: stories.len(),
            fallback_count: 0,
            excluded: 0,
            unmatched: 0,
            undated: 0,
            expired: 0,
            suppressed: 0,
            stories,
        }
    }

    fn story(title: &str, source: &str) -> Story {
        let mut story = Story::from(Record::new(title, source).with_link("https://a.com/1"));
        story.parsed_time = Some(Utc::now());
        story
    }

    #[test]
    fn test_empty_digest() {
        let md = render_digest(&outcome(Vec::new()), &Keywords::default(), (24, 48), Utc::now());
        assert!(md.contains("暂无符合条件的资讯"));
        assert!(!md.contains("重点速递"));
    }

    #[test]
    fn test_digest_sections() {
        let mut hot = story("OpenAI launches GPT-5", "OpenAI");
        hot.record.description = Some("A new model".into());
        let stories = vec![hot, story("Rust 1.90 release notes", "Hacker News")];

        let md = render_digest(&outcome(stories), &Keywords::new(["GPT-5"]), (24, 48), Utc::now());
        assert!(md.contains("## 🔥 重点速递"));
        assert!(md.contains("**1. OpenAI launches GPT-5**"));
        assert!(md.contains("- 💬 A new model..."));
        assert!(md.contains("## 📊 技术动态"));
        assert!(md.contains("1. [Rust 1.90 release notes](https://a.com/1)"));
        assert!(md.contains("Hacker News, OpenAI"));
        assert!(md.contains("🔥 1 + 📊 1"));
    }

    #[test]
    fn test_fallback_window_is_named() {
        let mut fallback = outcome(vec![story("t", "s")]);
        fallback.window = Window::Fallback;
        let md = render_digest(&fallback, &Keywords::default(), (24, 48), Utc::now());
        assert!(md.contains("过去 48 小时"));
    }

    #[test]
    fn test_hot_report() {
        let clusters = vec![RankedCluster {
            title: "一个非常非常非常非常非常非常非常非常非常非常非常非常长的热搜标题".to_string(),
            url: Some("https://s.weibo.com/1".to_string()),
            popularity: Some(Popularity::Text("520万".to_string())),
            representative_title: "t".to_string(),
            platforms: vec!["微博".to_string(), "百度".to_string()],
            platform_count: 2,
            member_count: 2,
            latest_time: None,
            score: 230.0,
        }];
        let boards = vec![
            BoardListing {
                name: "微博热搜".to_string(),
                records: Some(vec![Record::new("某明星官宣", "微博").with_popularity("520万")]),
            },
            BoardListing {
                name: "知乎热榜".to_string(),
                records: None,
            },
        ];

        let md = render_hot(&clusters, &boards, Utc::now());
        assert!(md.contains("## 🔥 TOP 1 热点"));
        assert!(md.contains("🔥520万 [2平台]"));
        assert!(md.contains("...**"), "Long titles should be shortened");
        assert!(md.contains("[查看详情](https://s.weibo.com/1)"));
        assert!(md.contains("1. 某明星官宣 🔥520万"));
        assert!(md.contains("**知乎热榜**\n❌ 获取失败"));
    }
}
