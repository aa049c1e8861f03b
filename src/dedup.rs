//! Two-pass parallel deduplication
//!
//! ```text
//! pass 1 (count):  worker i tallies uuid and title of every record in chunk i
//!                  into two shared concurrent counters
//!        ── barrier ──
//! pass 2 (filter): worker i keeps records of chunk i whose uuid count AND
//!                  title count are both exactly 1
//! ```
//!
//! A record is dropped when either signal collides, even if the colliding
//! records differ in everything else. Dropped records are only counted.

use crate::article::Article;
use crate::partition::chunk_range;
use crate::pool::{split_results, WorkerPool};
use dashmap::DashMap;
use log::info;
use rustc_hash::FxBuildHasher;

/// Shared occurrence counters for the two identity signals
pub struct DedupTally<'a> {
    keys: DashMap<&'a str, usize, FxBuildHasher>,
    titles: DashMap<&'a str, usize, FxBuildHasher>,
}

impl<'a> DedupTally<'a> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: DashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            titles: DashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
        }
    }

    /// Count one occurrence of the record's uuid and title
    pub fn record(&self, article: &'a Article) {
        *self.keys.entry(article.uuid.as_str()).or_insert(0) += 1;
        *self.titles.entry(article.title.as_str()).or_insert(0) += 1;
    }

    pub fn key_count(&self, key: &str) -> usize {
        self.keys.get(key).map(|count| *count).unwrap_or(0)
    }

    pub fn title_count(&self, title: &str) -> usize {
        self.titles.get(title).map(|count| *count).unwrap_or(0)
    }

    /// True iff neither the uuid nor the title occurs anywhere else
    pub fn is_unique(&self, article: &Article) -> bool {
        self.key_count(&article.uuid) == 1 && self.title_count(&article.title) == 1
    }

    /// Sum of all uuid counts; equals the number of records counted
    pub fn total_keys(&self) -> usize {
        self.keys.iter().map(|entry| *entry.value()).sum()
    }

    /// Sum of all title counts; equals the number of records counted
    pub fn total_titles(&self) -> usize {
        self.titles.iter().map(|entry| *entry.value()).sum()
    }
}

/// Result of deduplicating a corpus
#[derive(Debug)]
pub struct DedupOutcome<'a> {
    /// Surviving records, in chunk order
    pub unique: Vec<&'a Article>,
    /// `total - unique.len()`
    pub duplicates: usize,
    pub tasks_failed: usize,
}

/// Run both passes over `articles` on the pool
pub fn deduplicate<'a>(pool: &WorkerPool, articles: &'a [Article]) -> DedupOutcome<'a> {
    let total = articles.len();
    let workers = pool.workers();
    let tally = DedupTally::with_capacity(total);

    let counted = pool.run("dedup-count", |id| {
        for article in &articles[chunk_range(total, workers, id)] {
            tally.record(article);
        }
    });
    let (_, count_failures) = split_results(counted);

    let filtered = pool.run("dedup-filter", |id| {
        articles[chunk_range(total, workers, id)]
            .iter()
            .filter(|article| tally.is_unique(article))
            .collect::<Vec<&Article>>()
    });
    let (locals, filter_failures) = split_results(filtered);

    let unique: Vec<&Article> = locals.into_iter().flatten().collect();
    let duplicates = total - unique.len();
    info!(
        "Deduplication: {} records, {} unique, {} duplicates",
        total,
        unique.len(),
        duplicates
    );

    DedupOutcome {
        unique,
        duplicates,
        tasks_failed: count_failures.len() + filter_failures.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::article;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::num::NonZeroUsize;

    fn pool(n: usize) -> WorkerPool {
        WorkerPool::new(NonZeroUsize::new(n).unwrap()).unwrap()
    }

    fn titled(uuid: &str, title: &str) -> Article {
        let mut a = article(uuid, 0);
        a.title = title.to_string();
        a
    }

    #[test]
    fn test_all_distinct() {
        let articles: Vec<Article> = (0..250).map(|i| article(&format!("u{}", i), i)).collect();
        let outcome = deduplicate(&pool(4), &articles);
        assert_eq!(outcome.unique.len(), 250);
        assert_eq!(outcome.duplicates, 0);
        assert_eq!(outcome.tasks_failed, 0);
    }

    #[test]
    fn test_duplicate_key_drops_every_copy() {
        let articles = vec![titled("a", "one"), titled("a", "two"), titled("b", "three")];
        let outcome = deduplicate(&pool(2), &articles);
        let keys: Vec<&str> = outcome.unique.iter().map(|a| a.uuid.as_str()).collect();
        assert_eq!(keys, vec!["b"]);
        assert_eq!(outcome.duplicates, 2);
    }

    #[test]
    fn test_title_collision_alone_excludes() {
        let articles = vec![titled("a", "same"), titled("b", "same"), titled("c", "other")];
        let outcome = deduplicate(&pool(3), &articles);
        let keys: Vec<&str> = outcome.unique.iter().map(|a| a.uuid.as_str()).collect();
        assert_eq!(keys, vec!["c"]);
        assert_eq!(outcome.duplicates, 2);
    }

    #[test]
    fn test_more_workers_than_records() {
        let articles = vec![titled("a", "x")];
        let outcome = deduplicate(&pool(8), &articles);
        assert_eq!(outcome.unique.len(), 1);
    }

    #[test]
    fn test_empty_corpus() {
        let outcome = deduplicate(&pool(3), &[]);
        assert!(outcome.unique.is_empty());
        assert_eq!(outcome.duplicates, 0);
    }

    #[test]
    fn test_tally_totals_match_record_count() {
        let articles = vec![titled("a", "x"), titled("a", "y"), titled("b", "x"), titled("c", "z")];
        let tally = DedupTally::with_capacity(4);
        for a in &articles {
            tally.record(a);
        }
        assert_eq!(tally.total_keys(), 4);
        assert_eq!(tally.total_titles(), 4);
        assert_eq!(tally.key_count("a"), 2);
        assert_eq!(tally.title_count("x"), 2);
        assert_eq!(tally.key_count("missing"), 0);
    }

    proptest! {
        #[test]
        fn unique_count_matches_sequential_rule(
            pairs in proptest::collection::vec((0u8..40, 0u8..40), 0..300),
            workers in 1usize..9,
        ) {
            let articles: Vec<Article> = pairs
                .iter()
                .map(|(k, t)| titled(&format!("k{}", k), &format!("t{}", t)))
                .collect();

            let mut keys: HashMap<&str, usize> = HashMap::new();
            let mut titles: HashMap<&str, usize> = HashMap::new();
            for a in &articles {
                *keys.entry(a.uuid.as_str()).or_default() += 1;
                *titles.entry(a.title.as_str()).or_default() += 1;
            }
            let expected = articles
                .iter()
                .filter(|a| keys[a.uuid.as_str()] == 1 && titles[a.title.as_str()] == 1)
                .count();

            let outcome = deduplicate(&pool(workers), &articles);
            prop_assert_eq!(outcome.unique.len(), expected);
            prop_assert_eq!(outcome.unique.len() + outcome.duplicates, articles.len());
        }
    }
}
