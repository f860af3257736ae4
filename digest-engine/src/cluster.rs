//! Greedy cross-source clustering

use std::cmp::Ordering;
use std::collections::HashMap;

use digest_core::{Cluster, RankedCluster, Record};
use tracing::debug;

use crate::popularity::popularity_value;
use crate::scoring::score_cluster;
use crate::similarity::{title_similarity, Stopwords};
use crate::timestamp::parse_timestamp;

/// Group records that report the same story
///
/// Each record joins the first cluster, in creation order, whose
/// representative title is at least `threshold` similar; otherwise it opens a
/// new cluster. Results depend on arrival order.
pub fn build_clusters(records: Vec<Record>, threshold: f64, stopwords: &Stopwords) -> Vec<Cluster> {
    let total = records.len();
    let mut clusters: Vec<Cluster> = Vec::new();

    for record in records {
        let target = clusters.iter().position(|cluster| {
            title_similarity(&record.title, &cluster.representative_title, stopwords) >= threshold
        });
        match target {
            Some(idx) => clusters[idx].push(record),
            None => clusters.push(Cluster::new(record)),
        }
    }

    debug!("Clustered {} records into {} clusters", total, clusters.len());
    clusters
}

/// Member with the highest popularity, lower rank breaking ties
///
/// Missing popularity loses to any present value and a missing rank loses to
/// any present rank. The earliest member wins a full tie.
pub fn best_member(cluster: &Cluster) -> Option<&Record> {
    let mut best: Option<&Record> = None;
    for member in &cluster.members {
        best = match best {
            Some(current) if compare_members(member, current) != Ordering::Greater => Some(current),
            _ => Some(member),
        };
    }
    best
}

fn compare_members(a: &Record, b: &Record) -> Ordering {
    let pop_a = a.popularity.as_ref().and_then(popularity_value);
    let pop_b = b.popularity.as_ref().and_then(popularity_value);

    let by_popularity = match (pop_a, pop_b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    };

    by_popularity.then_with(|| match (a.rank_in_source, b.rank_in_source) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    })
}

/// Score a cluster and take its display identity from the best member
pub fn summarize_cluster(cluster: &Cluster, platform_weights: &HashMap<String, f64>) -> RankedCluster {
    let best = best_member(cluster);

    let latest_time = cluster
        .members
        .iter()
        .filter_map(|member| member.published_at.as_deref().and_then(parse_timestamp))
        .max();

    RankedCluster {
        title: best
            .map(|m| m.title.clone())
            .unwrap_or_else(|| cluster.representative_title.clone()),
        url: best.and_then(|m| m.link.clone()),
        popularity: best.and_then(|m| m.popularity.clone()),
        representative_title: cluster.representative_title.clone(),
        platforms: cluster.platforms.iter().cloned().collect(),
        platform_count: cluster.platform_count(),
        member_count: cluster.members.len(),
        latest_time,
        score: score_cluster(cluster, platform_weights),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similar_titles_share_a_cluster() {
        let records = vec![
            Record::new("某明星官宣结婚", "微博"),
            Record::new("某明星官宣结婚 网友送祝福", "百度"),
            Record::new("国足世预赛名单公布", "知乎"),
        ];
        let clusters = build_clusters(records, 0.6, &Stopwords::standard());
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members.len(), 2);
        assert_eq!(clusters[0].platform_count(), 2);
        assert_eq!(clusters[1].representative_title, "国足世预赛名单公布");
    }

    #[test]
    fn test_joins_first_matching_cluster() {
        let stopwords = Stopwords::standard();
        let records = vec![
            Record::new("alpha beta", "a"),
            Record::new("gamma delta", "b"),
            Record::new("alpha beta gamma delta", "c"),
        ];
        let clusters = build_clusters(records, 0.6, &stopwords);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members.len(), 2, "Should join the earliest match");
        assert_eq!(clusters[1].members.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_clusters(Vec::new(), 0.6, &Stopwords::standard()).is_empty());
    }

    #[test]
    fn test_best_member_prefers_popularity_then_rank() {
        let mut cluster = Cluster::new(Record::new("a", "微博").with_rank(1));
        cluster.push(Record::new("b", "百度").with_rank(5).with_popularity("2万"));
        cluster.push(Record::new("c", "知乎").with_rank(2).with_popularity(20_000.0));
        let best = best_member(&cluster).unwrap();
        assert_eq!(best.title, "c", "Equal popularity should fall back to lower rank");
    }

    #[test]
    fn test_best_member_keeps_first_on_tie() {
        let mut cluster = Cluster::new(Record::new("first", "微博").with_rank(3));
        cluster.push(Record::new("second", "百度").with_rank(3));
        assert_eq!(best_member(&cluster).unwrap().title, "first");
    }

    #[test]
    fn test_summarize_uses_best_member_identity() {
        let mut cluster = Cluster::new(
            Record::new("某明星官宣", "微博")
                .with_rank(4)
                .published("2024-01-01T10:00:00Z"),
        );
        cluster.push(
            Record::new("某明星官宣结婚", "百度")
                .with_rank(1)
                .with_link("https://top.baidu.com/1")
                .with_popularity("500万")
                .published("2024-01-01T12:00:00Z"),
        );

        let ranked = summarize_cluster(&cluster, &HashMap::new());
        assert_eq!(ranked.title, "某明星官宣结婚");
        assert_eq!(ranked.url.as_deref(), Some("https://top.baidu.com/1"));
        assert_eq!(ranked.representative_title, "某明星官宣");
        assert_eq!(ranked.platforms, vec!["微博", "百度"]);
        assert_eq!(ranked.member_count, 2);
        assert_eq!(
            ranked.latest_time.map(|t| t.to_rfc3339()),
            Some("2024-01-01T12:00:00+00:00".to_string())
        );
        assert!(ranked.score > 200.0);
    }
}
