//! Run configuration threaded through every pipeline component

use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Records claimed per cursor advance during aggregation
pub const BATCH_SIZE: usize = 50;

/// Spans shorter than this are always merge-sorted sequentially
pub const SEQUENTIAL_SORT_THRESHOLD: usize = 100;

/// Configuration for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Size of the fixed worker pool used by every phase
    pub workers: NonZeroUsize,
    /// Directory that receives every output artifact
    pub output_dir: PathBuf,
}

impl PipelineConfig {
    /// Configuration writing into the current directory
    pub fn new(workers: NonZeroUsize) -> Self {
        Self {
            workers,
            output_dir: PathBuf::from("."),
        }
    }

    /// Redirect output artifacts into `dir`
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn worker_count(&self) -> usize {
        self.workers.get()
    }
}
