//! RSS/Atom parsing into digest records

use digest_core::Record;
use regex::Regex;
use tracing::debug;

use crate::error::{FeedError, FeedResult};
use crate::sources::FeedSource;

/// Descriptions are cut to this many characters
pub const DESCRIPTION_CHARS: usize = 150;
/// Authors listed in an arXiv description
const ARXIV_AUTHORS: usize = 2;
const ARXIV_PREFIX: &str = "[论文]";

/// Parse a feed body into records labelled with the source name
///
/// RSS is tried first, then Atom. Entries without a title or a link are
/// skipped. Timestamps are kept raw for the engine to parse.
pub fn parse_feed(content: &[u8], source: &FeedSource) -> FeedResult<Vec<Record>> {
    let records = if let Ok(channel) = rss::Channel::read_from(content) {
        parse_rss_channel(&channel, source)
    } else if let Ok(feed) = atom_syndication::Feed::read_from(content) {
        parse_atom_feed(&feed, source)
    } else {
        return Err(FeedError::ParseError(format!(
            "Failed to parse feed: {}",
            source.name
        )));
    };

    debug!("Parsed {} records from {}", records.len(), source.name);
    Ok(records)
}

fn parse_rss_channel(channel: &rss::Channel, source: &FeedSource) -> Vec<Record> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let title = item.title().map(str::trim).filter(|t| !t.is_empty())?;
            let link = item.link().map(str::trim).filter(|l| !l.is_empty())?;

            let published = item.pub_date().map(str::to_string).or_else(|| {
                item.dublin_core_ext()
                    .and_then(|dc| dc.dates().first().cloned())
            });

            let description = item
                .description()
                .or_else(|| item.content())
                .map(summarize)
                .unwrap_or_default();

            let authors: Vec<&str> = match item.author() {
                Some(author) => vec![author],
                None => item
                    .dublin_core_ext()
                    .map(|dc| dc.creators().iter().map(String::as_str).collect())
                    .unwrap_or_default(),
            };

            Some(build_record(title, link, published, description, &authors, source))
        })
        .collect()
}

fn parse_atom_feed(feed: &atom_syndication::Feed, source: &FeedSource) -> Vec<Record> {
    feed.entries()
        .iter()
        .filter_map(|entry| {
            let title = entry.title().as_str().trim();
            if title.is_empty() {
                return None;
            }

            let link = entry
                .links()
                .iter()
                .find(|l| l.rel() == "alternate")
                .or_else(|| entry.links().first())
                .map(|l| l.href().trim())
                .filter(|href| !href.is_empty())?;

            let published = entry
                .published()
                .unwrap_or_else(|| entry.updated())
                .to_rfc3339();

            let description = entry
                .summary()
                .map(|s| s.as_str())
                .or_else(|| entry.content().and_then(|c| c.value()))
                .map(summarize)
                .unwrap_or_default();

            let authors: Vec<&str> = entry.authors().iter().map(|p| p.name()).collect();

            Some(build_record(title, link, Some(published), description, &authors, source))
        })
        .collect()
}

fn build_record(
    title: &str,
    link: &str,
    published: Option<String>,
    description: String,
    authors: &[&str],
    source: &FeedSource,
) -> Record {
    let mut title = unescape_html(title);
    let mut description = description;

    if source.is_arxiv() {
        title = format!("{} {}", ARXIV_PREFIX, title);
        let names: Vec<&str> = authors
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .take(ARXIV_AUTHORS)
            .collect();
        if !names.is_empty() {
            description = format!("作者: {}", names.join(", "));
        }
    }

    Record {
        title,
        link: Some(link.to_string()),
        source: source.name.clone(),
        description: (!description.is_empty()).then_some(description),
        published_at: published,
        ..Record::default()
    }
}

/// Plain-text description cut to [`DESCRIPTION_CHARS`]
fn summarize(html: &str) -> String {
    strip_html(&unescape_html(html))
        .chars()
        .take(DESCRIPTION_CHARS)
        .collect()
}

/// Strip HTML tags and collapse whitespace
pub fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode common named and numeric HTML entities
pub fn unescape_html(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let decoded = match Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);") {
        Ok(numeric) => numeric
            .replace_all(text, |caps: &regex::Captures| {
                let code = &caps[1];
                let value = match code.strip_prefix('x') {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => code.parse::<u32>().ok(),
                };
                value
                    .and_then(char::from_u32)
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned(),
        Err(_) => text.to_string(),
    };

    decoded
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
