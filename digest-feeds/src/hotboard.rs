//! Hot-board JSON parsing

use digest_core::{HotboardFormat, Popularity, Record};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{FeedError, FeedResult};

const WEIXIN_SEARCH: &str = "https://weixin.sogou.com/weixin";
const PROVIDER_OK: i64 = 200;

#[derive(Debug, Deserialize)]
struct UapiResponse {
    #[serde(default)]
    list: Option<Vec<UapiEntry>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UapiEntry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    hot_value: Option<Popularity>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TianapiResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    result: Option<TianapiResult>,
}

#[derive(Debug, Default, Deserialize)]
struct TianapiResult {
    #[serde(default)]
    list: Vec<TianapiEntry>,
}

#[derive(Debug, Deserialize)]
struct TianapiEntry {
    #[serde(default)]
    word: String,
}

#[derive(Debug, Deserialize)]
struct ItapiResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Vec<ItapiEntry>,
}

#[derive(Debug, Deserialize)]
struct ItapiEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    viewnum: Option<Popularity>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    rank: Option<Value>,
}

/// Parse a hot-board document of the given provider format
///
/// Reads at most `limit` entries. Ranks are the 1-based position in the
/// list unless the provider publishes its own; entries with a blank title
/// are skipped but keep their position. Heat values are kept as published.
pub fn parse_hotboard(
    content: &[u8],
    format: HotboardFormat,
    source: &str,
    limit: usize,
) -> FeedResult<Vec<Record>> {
    let records = match format {
        HotboardFormat::Uapi => parse_uapi(content, source, limit)?,
        HotboardFormat::Tianapi => parse_tianapi(content, source, limit)?,
        HotboardFormat::Itapi => parse_itapi(content, source, limit)?,
    };

    debug!("Parsed {} hot-board records from {}", records.len(), source);
    Ok(records)
}

fn decode<'a, T: Deserialize<'a>>(content: &'a [u8], source: &str) -> FeedResult<T> {
    serde_json::from_slice(content).map_err(|e| FeedError::ParseError(format!("{}: {}", source, e)))
}

/// Keyed providers answer HTTP 200 and report failures in `code`
fn check_code(code: Option<i64>, msg: Option<String>, source: &str) -> FeedResult<()> {
    match code {
        Some(PROVIDER_OK) => Ok(()),
        other => Err(FeedError::ApiError {
            status: other.and_then(|c| u16::try_from(c).ok()).unwrap_or(0),
            message: format!("{}: {}", source, msg.unwrap_or_else(|| "unknown error".to_string())),
        }),
    }
}

fn parse_uapi(content: &[u8], source: &str, limit: usize) -> FeedResult<Vec<Record>> {
    let response: UapiResponse = decode(content, source)?;

    if let Some(error) = response.error {
        return Err(FeedError::RequestFailed(format!("{}: {}", source, error)));
    }
    let entries = response
        .list
        .ok_or_else(|| FeedError::ParseError(format!("{}: missing list", source)))?;

    Ok(entries
        .into_iter()
        .take(limit)
        .enumerate()
        .filter_map(|(idx, entry)| {
            board_record(&entry.title, source, idx as u32 + 1).map(|record| Record {
                link: entry.url.filter(|u| !u.trim().is_empty()),
                popularity: entry.hot_value.filter(|p| !is_blank(p)),
                ..record
            })
        })
        .collect())
}

fn parse_tianapi(content: &[u8], source: &str, limit: usize) -> FeedResult<Vec<Record>> {
    let response: TianapiResponse = decode(content, source)?;
    check_code(response.code, response.msg, source)?;

    Ok(response
        .result
        .unwrap_or_default()
        .list
        .into_iter()
        .take(limit)
        .enumerate()
        .filter_map(|(idx, entry)| {
            board_record(&entry.word, source, idx as u32 + 1).map(|record| Record {
                link: weixin_search_url(&record.title),
                ..record
            })
        })
        .collect())
}

fn parse_itapi(content: &[u8], source: &str, limit: usize) -> FeedResult<Vec<Record>> {
    let response: ItapiResponse = decode(content, source)?;
    check_code(response.code, response.msg, source)?;

    Ok(response
        .data
        .into_iter()
        .take(limit)
        .enumerate()
        .filter_map(|(idx, entry)| {
            let rank = entry.rank.as_ref().and_then(published_rank).unwrap_or(idx as u32 + 1);
            board_record(&entry.name, source, rank).map(|record| Record {
                link: entry.url.filter(|u| !u.trim().is_empty()),
                popularity: entry.viewnum.filter(|p| !is_blank(p)),
                ..record
            })
        })
        .collect())
}

fn board_record(title: &str, source: &str, rank: u32) -> Option<Record> {
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    Some(Record {
        title: title.to_string(),
        source: source.to_string(),
        rank_in_source: Some(rank),
        ..Record::default()
    })
}

fn is_blank(popularity: &Popularity) -> bool {
    matches!(popularity, Popularity::Text(t) if t.trim().is_empty())
}

/// Positive rank published as a number or a numeric string
fn published_rank(value: &Value) -> Option<u32> {
    let rank = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    u32::try_from(rank).ok().filter(|r| *r > 0)
}

/// WeChat topics carry no link; point at a Sogou article search instead
fn weixin_search_url(word: &str) -> Option<String> {
    Url::parse_with_params(WEIXIN_SEARCH, &[("type", "2"), ("query", word)])
        .ok()
        .map(String::from)
}
