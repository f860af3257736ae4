//! Near-duplicate suppression for a single story list

use std::collections::HashSet;

use digest_core::Story;
use tracing::{debug, trace};

use crate::canonical::canonicalize;
use crate::similarity::{title_similarity, Stopwords};

/// Drop stories that repeat an earlier one
///
/// A story is dropped when its canonical link was already kept, or when its
/// title is at least `threshold` similar to any kept title. Survivors keep
/// their order and carry the canonical link (`None` when it is blank).
pub fn suppress_duplicates(stories: Vec<Story>, threshold: f64, stopwords: &Stopwords) -> Vec<Story> {
    let total = stories.len();
    let mut seen_links: HashSet<String> = HashSet::new();
    let mut kept_titles: Vec<String> = Vec::new();
    let mut kept: Vec<Story> = Vec::new();

    for mut story in stories {
        let link = canonicalize(story.record.link_str());

        if !link.is_empty() && seen_links.contains(&link) {
            trace!("Dropping {:?}: duplicate link {}", story.title(), link);
            continue;
        }

        if kept_titles
            .iter()
            .any(|kept| title_similarity(story.title(), kept, stopwords) >= threshold)
        {
            trace!("Dropping {:?}: similar title already kept", story.title());
            continue;
        }

        if link.is_empty() {
            story.record.link = None;
        } else {
            seen_links.insert(link.clone());
            story.record.link = Some(link);
        }
        kept_titles.push(story.record.title.clone());
        kept.push(story);
    }

    debug!("Suppression kept {} of {} stories", kept.len(), total);
    kept
}
