//! Fixed-size worker pool shared by every pipeline phase
//!
//! Each call to [`WorkerPool::run`] or [`WorkerPool::run_each`] is one phase:
//! tasks are submitted to the pool and every one of them is joined before the
//! call returns, so phases never overlap.
//!
//! ```text
//! phase N:   submit(task 0..k) ──► [pool threads] ──► join all ──► Vec<Result<T, TaskFailure>>
//! phase N+1: starts only after the join above
//! ```
//!
//! A panicking task does not take the phase down with it: the panic is caught
//! at task scope and reported as a [`TaskFailure`] in that task's slot.

use crate::error::{NewsError, Result};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::fmt;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};

/// Default thread name prefix for pool threads
pub const DEFAULT_THREAD_PREFIX: &str = "newsagg-worker";

/// A task that could not be joined successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub phase: String,
    pub task: usize,
    pub message: String,
}

impl TaskFailure {
    fn from_panic(phase: &str, task: usize, payload: Box<dyn Any + Send>) -> Self {
        Self {
            phase: phase.to_string(),
            task,
            message: panic_message(payload.as_ref()),
        }
    }
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} task {} failed: {}",
            self.phase, self.task, self.message
        )
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Fixed pool of OS threads
pub struct WorkerPool {
    pool: ThreadPool,
    workers: usize,
}

impl WorkerPool {
    /// Build a pool with `workers` threads named `newsagg-worker-<i>`
    pub fn new(workers: NonZeroUsize) -> Result<Self> {
        Self::with_thread_prefix(workers, DEFAULT_THREAD_PREFIX)
    }

    /// Build a pool whose threads are named `<prefix>-<i>`
    pub fn with_thread_prefix(workers: NonZeroUsize, prefix: &str) -> Result<Self> {
        let prefix = prefix.to_string();
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.get())
            .thread_name(move |i| format!("{}-{}", prefix, i))
            .build()
            .map_err(|e| NewsError::Pool(e.to_string()))?;

        Ok(Self {
            pool,
            workers: workers.get(),
        })
    }

    /// Number of threads in the pool
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `task(worker_id)` once per pool thread and join all of them.
    ///
    /// Results come back indexed by worker id, not by completion order.
    pub fn run<T, F>(&self, phase: &str, task: F) -> Vec<std::result::Result<T, TaskFailure>>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        let ids: Vec<usize> = (0..self.workers).collect();
        self.run_each(phase, ids, |_, id| task(id))
    }

    /// Run `task(index, item)` for every item and join all of them.
    ///
    /// At most `workers()` tasks execute at once; the rest wait in the pool.
    pub fn run_each<I, T, F>(
        &self,
        phase: &str,
        items: Vec<I>,
        task: F,
    ) -> Vec<std::result::Result<T, TaskFailure>>
    where
        I: Send,
        T: Send,
        F: Fn(usize, I) -> T + Sync,
    {
        let mut slots: Vec<Option<std::result::Result<T, TaskFailure>>> =
            (0..items.len()).map(|_| None).collect();
        let task = &task;

        self.pool.scope(|scope| {
            for (index, (slot, item)) in slots.iter_mut().zip(items).enumerate() {
                scope.spawn(move |_| {
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| task(index, item)));
                    *slot = Some(
                        outcome.map_err(|payload| TaskFailure::from_panic(phase, index, payload)),
                    );
                });
            }
        });

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    Err(TaskFailure {
                        phase: phase.to_string(),
                        task: index,
                        message: "task never completed".to_string(),
                    })
                })
            })
            .collect()
    }

    /// Run `op` inside the pool so rayon parallel iterators use its threads
    pub fn install<R, OP>(&self, op: OP) -> R
    where
        R: Send,
        OP: FnOnce() -> R + Send,
    {
        self.pool.install(op)
    }
}

/// Split joined results into successes and failures, logging each failure
pub fn split_results<T>(
    results: Vec<std::result::Result<T, TaskFailure>>,
) -> (Vec<T>, Vec<TaskFailure>) {
    let mut ok = Vec::with_capacity(results.len());
    let mut failed = Vec::new();
    for result in results {
        match result {
            Ok(value) => ok.push(value),
            Err(failure) => {
                log::warn!("{}", failure);
                failed.push(failure);
            }
        }
    }
    (ok, failed)
}
