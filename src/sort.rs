//! Hybrid parallel merge sort
//!
//! Articles are ordered most recent first; equal timestamps fall back to the
//! uuid in ascending order. The same comparator drives every path, so the
//! result is identical whatever the worker count.
//!
//! # Algorithm
//!
//! ```text
//! n < 100 or 1 worker ─► sequential top-down merge sort
//!
//! otherwise:
//!   [ chunk 0 | chunk 1 | ... | chunk W-1 ]   sorted in parallel, one per task,
//!                                             each using its slice of `aux`
//!   ── join all ──  (any failed task ─► restore input, sort sequentially)
//!   run = chunk_size
//!   while run < n: merge adjacent runs pairwise, run *= 2   (calling thread)
//! ```

use crate::article::Article;
use crate::config::SEQUENTIAL_SORT_THRESHOLD;
use crate::partition::chunk_size;
use crate::pool::{split_results, WorkerPool};
use log::warn;
use std::cmp::Ordering;

/// Most recent first, then uuid ascending
pub fn recency_order(a: &Article, b: &Article) -> Ordering {
    b.published
        .cmp(&a.published)
        .then_with(|| a.uuid.cmp(&b.uuid))
}

/// How a sort was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStrategy {
    /// Small input or a single worker
    Sequential,
    /// Parallel chunk sorts followed by the pairwise merge passes
    Parallel { chunks: usize },
    /// A chunk task failed and the whole span was re-sorted sequentially
    SequentialFallback,
}

/// Merge the sorted halves `data[..mid]` and `data[mid..]`
///
/// `aux` must be the same length as `data`. Ties take the left element,
/// which keeps the sort stable.
fn merge<T, F>(data: &mut [T], aux: &mut [T], mid: usize, cmp: &F)
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    let n = data.len();
    aux.clone_from_slice(data);

    let (mut i, mut j) = (0, mid);
    for slot in data.iter_mut() {
        if i < mid && (j >= n || cmp(&aux[i], &aux[j]) != Ordering::Greater) {
            *slot = aux[i].clone();
            i += 1;
        } else {
            *slot = aux[j].clone();
            j += 1;
        }
    }
}

/// Classic top-down recursive merge sort using `aux` as scratch space
pub fn sequential_merge_sort<T, F>(data: &mut [T], aux: &mut [T], cmp: &F)
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    let n = data.len();
    if n <= 1 {
        return;
    }
    let mid = n.div_ceil(2);
    {
        let (left, right) = data.split_at_mut(mid);
        let (aux_left, aux_right) = aux.split_at_mut(mid);
        sequential_merge_sort(left, aux_left, cmp);
        sequential_merge_sort(right, aux_right, cmp);
    }
    merge(data, &mut aux[..n], mid, cmp);
}

/// Sort `data` with `cmp`, splitting the work across the pool
pub fn parallel_merge_sort<T, F>(pool: &WorkerPool, data: &mut [T], cmp: &F) -> SortStrategy
where
    T: Clone + Send,
    F: Fn(&T, &T) -> Ordering + Sync,
{
    let n = data.len();
    let workers = pool.workers();
    let mut aux = data.to_vec();

    if workers <= 1 || n < SEQUENTIAL_SORT_THRESHOLD {
        sequential_merge_sort(data, &mut aux, cmp);
        return SortStrategy::Sequential;
    }

    let chunk = chunk_size(n, workers);
    let original = data.to_vec();

    let tasks: Vec<(&mut [T], &mut [T])> = data.chunks_mut(chunk).zip(aux.chunks_mut(chunk)).collect();
    let chunks = tasks.len();
    let results = pool.run_each("sort-chunks", tasks, |_, (run, scratch)| {
        sequential_merge_sort(run, scratch, cmp)
    });

    let (_, failures) = split_results(results);
    if !failures.is_empty() {
        warn!(
            "{} of {} sort chunks failed; re-sorting {} records sequentially",
            failures.len(),
            chunks,
            n
        );
        data.clone_from_slice(&original);
        sequential_merge_sort(data, &mut aux, cmp);
        return SortStrategy::SequentialFallback;
    }

    let mut run = chunk;
    while run < n {
        let mut start = 0;
        while start + run < n {
            let end = (start + 2 * run).min(n);
            merge(&mut data[start..end], &mut aux[start..end], run, cmp);
            start += 2 * run;
        }
        run *= 2;
    }

    SortStrategy::Parallel { chunks }
}

/// Sort unique articles into the global listing order
pub fn sort_articles(pool: &WorkerPool, articles: &mut [&Article]) -> SortStrategy {
    parallel_merge_sort(pool, articles, &|a: &&Article, b: &&Article| recency_order(a, b))
}
