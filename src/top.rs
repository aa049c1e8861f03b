//! Top-N selection over the merged accumulators
//!
//! Every selection is a single linear scan. A candidate replaces the current
//! winner when its count is strictly greater, or when the counts are equal
//! and its name sorts lexicographically first. Hash-map iteration order
//! therefore never leaks into the result.

use crate::aggregate::{Accumulators, CountMap, KeyListMap};
use crate::article::{Article, Timestamp};

/// A winning bucket and its count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranked {
    pub name: String,
    pub count: usize,
}

/// True when `(name, count)` beats `current`
fn beats(name: &str, count: usize, current: Option<&(&str, usize)>) -> bool {
    match current {
        None => true,
        Some(&(best, best_count)) => count > best_count || (count == best_count && name < best),
    }
}

/// Pick the winner among `(name, count)` candidates
pub fn select_top<'a, I>(candidates: I) -> Option<Ranked>
where
    I: IntoIterator<Item = (&'a str, usize)>,
{
    let mut best: Option<(&str, usize)> = None;
    for (name, count) in candidates {
        if beats(name, count, best.as_ref()) {
            best = Some((name, count));
        }
    }
    best.map(|(name, count)| Ranked {
        name: name.to_string(),
        count,
    })
}

/// Winner of a counter map
pub fn top_count(map: &CountMap) -> Option<Ranked> {
    select_top(map.iter())
}

/// Winner of a key-list map, counting each bucket by its list length
pub fn top_bucket(map: &KeyListMap) -> Option<Ranked> {
    select_top(map.sizes())
}

/// The newest unique article, as reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MostRecent {
    pub uuid: String,
    pub url: String,
    pub published: Timestamp,
}

impl MostRecent {
    /// Head of the sorted unique listing, if any
    pub fn from_sorted(sorted: &[&Article]) -> Option<Self> {
        sorted.first().map(|article| Self {
            uuid: article.uuid.clone(),
            url: article.url.clone(),
            published: article.published,
        })
    }
}

/// Every winner shown in the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopSelections {
    pub author: Option<Ranked>,
    pub language: Option<Ranked>,
    pub category: Option<Ranked>,
    pub keyword: Option<Ranked>,
    pub most_recent: Option<MostRecent>,
}

impl TopSelections {
    pub fn select(accumulators: &Accumulators, sorted: &[&Article]) -> Self {
        Self {
            author: top_count(&accumulators.authors),
            language: top_bucket(&accumulators.languages),
            category: top_bucket(&accumulators.categories),
            keyword: top_count(&accumulators.keywords),
            most_recent: MostRecent::from_sorted(sorted),
        }
    }
}
