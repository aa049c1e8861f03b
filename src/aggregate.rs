//! Dynamic-batch aggregation of per-bucket statistics
//!
//! Workers share one atomic cursor over the sorted unique articles. Each
//! worker repeatedly claims the next [`BATCH_SIZE`] indices with a single
//! `fetch_add` and folds those records into its own [`Accumulators`]. Claims
//! never overlap, so every record is seen by exactly one worker exactly once.
//! English records cost far more than the rest (text normalization and
//! keyword extraction), which is why claims are dynamic rather than static
//! chunks.
//!
//! Once every worker has joined, the partial accumulators are merged into the
//! global ones: counters add up, key lists concatenate.

use crate::article::Article;
use crate::config::BATCH_SIZE;
use crate::pool::{split_results, WorkerPool};
use log::info;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Language tag whose texts feed keyword counting
pub const ENGLISH: &str = "english";

/// String-keyed counters; merging sums the counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountMap(FxHashMap<String, usize>);

impl CountMap {
    pub fn increment(&mut self, key: &str) {
        self.add(key, 1);
    }

    pub fn add(&mut self, key: &str, n: usize) {
        match self.0.get_mut(key) {
            Some(count) => *count += n,
            None => {
                self.0.insert(key.to_string(), n);
            }
        }
    }

    /// Count for `key`, zero when absent
    pub fn get(&self, key: &str) -> usize {
        self.0.get(key).copied().unwrap_or(0)
    }

    pub fn merge(&mut self, other: CountMap) {
        for (key, n) in other.0 {
            *self.0.entry(key).or_insert(0) += n;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(key, n)| (key.as_str(), *n))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Bucket → identity keys; merging concatenates the lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyListMap(FxHashMap<String, Vec<String>>);

impl KeyListMap {
    pub fn push(&mut self, bucket: &str, key: &str) {
        match self.0.get_mut(bucket) {
            Some(keys) => keys.push(key.to_string()),
            None => {
                self.0.insert(bucket.to_string(), vec![key.to_string()]);
            }
        }
    }

    pub fn get(&self, bucket: &str) -> Option<&[String]> {
        self.0.get(bucket).map(Vec::as_slice)
    }

    pub fn merge(&mut self, other: KeyListMap) {
        for (bucket, keys) in other.0 {
            self.0.entry(bucket).or_default().extend(keys);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(bucket, keys)| (bucket.as_str(), keys.as_slice()))
    }

    /// Bucket sizes, read as the length of each key list
    pub fn sizes(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(bucket, keys)| (bucket.as_str(), keys.len()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into owned `(bucket, keys)` pairs
    pub fn into_buckets(self) -> Vec<(String, Vec<String>)> {
        self.0.into_iter().collect()
    }
}

/// Every statistic gathered during aggregation
///
/// The same type serves as a worker's local partial and as the global
/// result the partials are merged into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulators {
    pub categories: KeyListMap,
    pub category_counts: CountMap,
    pub languages: KeyListMap,
    /// English keywords, counted once per article
    pub keywords: CountMap,
    pub authors: CountMap,
}

impl Accumulators {
    /// Fold one article into these accumulators
    pub fn observe(&mut self, article: &Article, linking_words: &FxHashSet<String>) {
        let categories: FxHashSet<&str> = article.categories.iter().map(String::as_str).collect();
        for category in categories {
            self.category_counts.increment(category);
            self.categories.push(category, &article.uuid);
        }

        if let Some(language) = article.language.as_deref().filter(|l| !l.is_empty()) {
            self.languages.push(language, &article.uuid);
        }

        if article.language.as_deref() == Some(ENGLISH) {
            if let Some(text) = article.text.as_deref() {
                for word in qualifying_words(text, linking_words) {
                    self.keywords.increment(&word);
                }
            }
        }

        if let Some(author) = article.author.as_deref().filter(|a| !a.trim().is_empty()) {
            self.authors.increment(author);
        }
    }

    /// Sum counters and concatenate key lists from `other`
    pub fn merge(&mut self, other: Accumulators) {
        self.categories.merge(other.categories);
        self.category_counts.merge(other.category_counts);
        self.languages.merge(other.languages);
        self.keywords.merge(other.keywords);
        self.authors.merge(other.authors);
    }
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Distinct keyword candidates of one English text
///
/// Lowercases, drops every character that is neither `a`-`z` nor whitespace,
/// splits on whitespace runs, and removes blanks and linking words.
pub fn qualifying_words(text: &str, linking_words: &FxHashSet<String>) -> FxHashSet<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .filter(|&c| c.is_ascii_lowercase() || is_space(c))
        .collect();

    normalized
        .split(is_space)
        .filter(|word| !word.is_empty() && !linking_words.contains(*word))
        .map(str::to_string)
        .collect()
}

/// Result of the aggregation phase
#[derive(Debug, Default)]
pub struct AggregateOutcome {
    pub accumulators: Accumulators,
    pub batches_claimed: usize,
    pub tasks_failed: usize,
}

/// Aggregate `articles` on the pool with dynamically claimed batches
pub fn aggregate(
    pool: &WorkerPool,
    articles: &[&Article],
    linking_words: &FxHashSet<String>,
) -> AggregateOutcome {
    let total = articles.len();
    let cursor = AtomicUsize::new(0);

    let results = pool.run("aggregate", |_| {
        let mut local = Accumulators::default();
        let mut batches = 0usize;
        loop {
            let start = cursor.fetch_add(BATCH_SIZE, Ordering::Relaxed);
            if start >= total {
                break;
            }
            let end = (start + BATCH_SIZE).min(total);
            for article in &articles[start..end] {
                local.observe(article, linking_words);
            }
            batches += 1;
        }
        (local, batches)
    });

    let (partials, failures) = split_results(results);
    let mut outcome = AggregateOutcome {
        tasks_failed: failures.len(),
        ..AggregateOutcome::default()
    };
    for (partial, batches) in partials {
        outcome.accumulators.merge(partial);
        outcome.batches_claimed += batches;
    }

    info!(
        "Aggregation: {} batches, {} categories, {} languages, {} keywords, {} authors",
        outcome.batches_claimed,
        outcome.accumulators.categories.len(),
        outcome.accumulators.languages.len(),
        outcome.accumulators.keywords.len(),
        outcome.accumulators.authors.len()
    );
    outcome
}
