//! Static range partitioning of an index space across workers
//!
//! Worker `id` of `workers` owns `[id * ceil(n / workers), min((id + 1) * ceil(n / workers), n))`.
//! Trailing workers may receive an empty range when `workers` does not evenly
//! divide `n` or when `n < workers`; callers simply do nothing for those.

use std::ops::Range;

/// Ceiling chunk length used by every static partition
pub fn chunk_size(n: usize, workers: usize) -> usize {
    if workers == 0 {
        return n;
    }
    n.div_ceil(workers)
}

/// Half-open index range owned by worker `id`
pub fn chunk_range(n: usize, workers: usize, id: usize) -> Range<usize> {
    let size = chunk_size(n, workers);
    let start = id.saturating_mul(size).min(n);
    let end = start.saturating_add(size).min(n);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_even_split() {
        assert_eq!(chunk_range(10, 2, 0), 0..5);
        assert_eq!(chunk_range(10, 2, 1), 5..10);
    }

    #[test]
    fn test_uneven_split_leaves_short_tail() {
        // ceil(10 / 4) = 3 -> 0..3, 3..6, 6..9, 9..10
        let ranges: Vec<_> = (0..4).map(|id| chunk_range(10, 4, id)).collect();
        assert_eq!(ranges, vec![0..3, 3..6, 6..9, 9..10]);
    }

    #[test]
    fn test_more_workers_than_items() {
        // ceil(3 / 5) = 1 -> workers 3 and 4 are idle
        assert_eq!(chunk_range(3, 5, 2), 2..3);
        assert!(chunk_range(3, 5, 3).is_empty());
        assert!(chunk_range(3, 5, 4).is_empty());
    }

    #[test]
    fn test_ceiling_can_starve_last_worker() {
        // ceil(9 / 4) = 3 -> the fourth worker gets nothing
        assert_eq!(chunk_range(9, 4, 2), 6..9);
        assert!(chunk_range(9, 4, 3).is_empty());
    }

    #[test]
    fn test_empty_space() {
        for id in 0..3 {
            assert!(chunk_range(0, 3, id).is_empty());
        }
    }

    proptest! {
        #[test]
        fn ranges_partition_exactly(n in 0usize..5_000, workers in 1usize..64) {
            let mut next = 0;
            for id in 0..workers {
                let range = chunk_range(n, workers, id);
                if range.is_empty() {
                    continue;
                }
                prop_assert_eq!(range.start, next);
                next = range.end;
            }
            prop_assert_eq!(next, n);
        }
    }
}
