//! Thread-safe FIFO of pending work, drained by a fixed set of workers
//!
//! The queue is filled once and closed before any worker starts, so
//! [`WorkQueue::claim`] never blocks: it either hands out the next item or
//! reports that the queue is exhausted. Each item is delivered to exactly one
//! caller.

use crossbeam_channel::{unbounded, Receiver};

/// Closed, pre-filled work queue
pub struct WorkQueue<T> {
    receiver: Receiver<T>,
}

impl<T> WorkQueue<T> {
    /// Fill a queue with `items` in order and close it
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let (sender, receiver) = unbounded();
        for item in items {
            // Cannot fail: the receiver is alive until the queue is dropped
            let _ = sender.send(item);
        }
        Self { receiver }
    }

    /// Take the next item, or `None` once the queue is drained
    pub fn claim(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Items not yet claimed
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::thread;

    #[test]
    fn test_fifo_then_exhausted() {
        let queue = WorkQueue::from_items(vec!["a", "b", "c"]);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.claim(), Some("a"));
        assert_eq!(queue.claim(), Some("b"));
        assert_eq!(queue.claim(), Some("c"));
        assert_eq!(queue.claim(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_empty_queue() {
        let queue: WorkQueue<u32> = WorkQueue::from_items(Vec::new());
        assert_eq!(queue.claim(), None);
    }

    #[test]
    fn test_concurrent_claims_deliver_each_item_once() {
        let queue = WorkQueue::from_items(0..10_000u32);
        let seen = Mutex::new(Vec::new());

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    let mut local = Vec::new();
                    while let Some(item) = queue.claim() {
                        local.push(item);
                    }
                    seen.lock().unwrap().extend(local);
                });
            }
        });

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 10_000);
        let unique: HashSet<u32> = seen.into_iter().collect();
        assert_eq!(unique.len(), 10_000);
    }
}
