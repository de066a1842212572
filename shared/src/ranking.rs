//! Ranking aggregation stages
//!
//! Pure, storage-independent halves of the two catalog aggregations:
//!
//! - tag popularity: unwind → group → count → sort
//! - top stores: floor on review count → sort by average rating → limit
//!
//! Both orderings are fully deterministic: equal counts fall back to the tag
//! string, equal averages to the review count and then the store key.

use crate::models::{RatingSummary, TagCount};
use std::collections::BTreeMap;

/// Minimum number of reviews before a store can appear in the ranking
pub const MIN_REVIEWS: u64 = 2;

/// Default size of the top-stores ranking
pub const DEFAULT_TOP_LIMIT: usize = 10;

/// Count tag occurrences across an already-unwound tag stream.
///
/// Each occurrence is one vote, so a store listing the same tag twice counts
/// twice. Output is sorted by count descending, then tag ascending.
pub fn tag_frequency<I, S>(tags: I) -> Vec<TagCount>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups: BTreeMap<String, u64> = BTreeMap::new();
    for tag in tags {
        *groups.entry(tag.as_ref().to_string()).or_default() += 1;
    }

    let mut counts: Vec<TagCount> = groups
        .into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect();
    // stable sort keeps the BTreeMap's ascending tag order within equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Arithmetic mean of a rating list, `None` when empty
pub fn average_rating(ratings: &[f64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
}

/// Apply the review-count floor, order by average rating and truncate.
pub fn rank_by_rating<K: Ord>(
    summaries: impl IntoIterator<Item = RatingSummary<K>>,
    limit: usize,
) -> Vec<RatingSummary<K>> {
    let mut ranked: Vec<RatingSummary<K>> = summaries
        .into_iter()
        .filter(|s| s.review_count >= MIN_REVIEWS)
        .collect();

    ranked.sort_by(|a, b| {
        b.average_rating
            .total_cmp(&a.average_rating)
            .then_with(|| b.review_count.cmp(&a.review_count))
            .then_with(|| a.store.cmp(&b.store))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(store: &str, ratings: &[f64]) -> RatingSummary<String> {
        RatingSummary {
            store: store.to_string(),
            review_count: ratings.len() as u64,
            average_rating: average_rating(ratings).unwrap_or(0.0),
        }
    }

    #[test]
    fn test_tag_frequency_counts_each_occurrence() {
        let stores: Vec<Vec<&str>> = vec![
            vec!["Wifi", "Open Late"],
            vec!["Wifi", "Wifi"],
            vec![],
            vec!["Family Friendly", "Open Late", "Wifi"],
        ];
        let counts = tag_frequency(stores.iter().flatten());

        assert_eq!(
            counts,
            vec![
                TagCount { tag: "Wifi".into(), count: 4 },
                TagCount { tag: "Open Late".into(), count: 2 },
                TagCount { tag: "Family Friendly".into(), count: 1 },
            ]
        );
        let total: u64 = counts.iter().map(|c| c.count).sum();
        assert_eq!(total, 7);
    }

    #[test]
    fn test_tag_frequency_ties_break_by_tag() {
        let counts = tag_frequency(["vegan", "bar", "licensed", "bar", "vegan"]);
        let order: Vec<&str> = counts.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(order, ["bar", "vegan", "licensed"]);
        assert!(counts.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_tag_frequency_empty() {
        assert!(tag_frequency(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[4.0, 4.0, 4.0]), Some(4.0));
        assert_eq!(average_rating(&[5.0, 2.0]), Some(3.5));
    }

    #[test]
    fn test_rank_excludes_single_review_stores() {
        let ranked = rank_by_rating(
            vec![
                summary("store:a", &[5.0, 5.0]),
                summary("store:b", &[5.0]),
                summary("store:c", &[4.0, 4.0, 4.0]),
            ],
            10,
        );

        let order: Vec<&str> = ranked.iter().map(|s| s.store.as_str()).collect();
        assert_eq!(order, ["store:a", "store:c"]);
        assert_eq!(ranked[0].average_rating, 5.0);
        assert_eq!(ranked[1].average_rating, 4.0);
    }

    #[test]
    fn test_rank_limit_and_order() {
        let summaries = vec![
            summary("store:a", &[3.0, 4.0]),
            summary("store:b", &[5.0, 4.0]),
            summary("store:c", &[2.0, 2.0]),
            summary("store:d", &[5.0, 5.0, 4.0, 4.0]),
        ];

        let ranked = rank_by_rating(summaries.clone(), 2);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|s| s.review_count >= MIN_REVIEWS));

        // b and d tie on 4.5; d has more reviews
        let order: Vec<&str> = ranked.iter().map(|s| s.store.as_str()).collect();
        assert_eq!(order, ["store:d", "store:b"]);

        assert!(rank_by_rating(summaries, 0).is_empty());
    }

    #[test]
    fn test_rank_full_tie_breaks_by_store() {
        let ranked = rank_by_rating(
            vec![summary("store:z", &[4.0, 4.0]), summary("store:m", &[4.0, 4.0])],
            10,
        );
        assert_eq!(ranked[0].store, "store:m");
        assert_eq!(ranked[1].store, "store:z");
    }
}
