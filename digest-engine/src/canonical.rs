//! Link canonicalization for exact-duplicate detection

use url::Url;

/// Strip tracking parameters and the fragment from a link
///
/// Query parameters whose key starts with `utm_` (any case) are removed and
/// the remaining ones re-encoded. Input that does not parse as an absolute
/// URL comes back trimmed but otherwise untouched, so the result is always
/// usable as a dedup key.
pub fn canonicalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut url = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(_) => return trimmed.to_string(),
    };

    if url.query().is_some() {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !key.to_lowercase().starts_with("utm_"))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept.iter());
        }
    }

    url.set_fragment(None);
    url.to_string()
}
