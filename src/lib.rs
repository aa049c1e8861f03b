//! newsagg - Parallel News Article Aggregator
//!
//! newsagg ingests a corpus of JSON news articles spread over many shard
//! files, drops duplicated articles, orders the survivors by recency and
//! builds per-category, per-language, per-author and English keyword
//! statistics. Every phase runs on one fixed-size worker pool.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use newsagg::{pipeline, PipelineConfig};
//! use std::num::NonZeroUsize;
//! use std::path::Path;
//!
//! let config = PipelineConfig::new(NonZeroUsize::new(4).unwrap()).with_output_dir("out");
//! let outcome = pipeline::run(&config, Path::new("articles.txt"), Path::new("inputs.txt"))?;
//!
//! println!("{} unique, {} duplicates", outcome.report.unique, outcome.report.duplicates);
//! if let Some(author) = &outcome.report.top.author {
//!     println!("best author: {} ({})", author.name, author.count);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  Inputs                                       │
//! │  articles listing ─► JSON shards (.json/.gz)  │
//! │  inputs listing   ─► languages / categories / │
//! │                      english linking words    │
//! └───────────────────────────────────────────────┘
//!          ↓ load (work queue)        ↓ parse (static chunks)
//! ┌───────────────────────────────────────────────┐
//! │  dedup (two passes) ─► merge sort (chunks +   │
//! │  merge passes) ─► aggregate (atomic batches)  │
//! └───────────────────────────────────────────────┘
//!          ↓ top-N, parallel writes
//! ┌───────────────────────────────────────────────┐
//! │  all_articles.txt, <category>.txt,            │
//! │  <language>.txt, keywords_count.txt,          │
//! │  reports.txt                                  │
//! └───────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]

// Module declarations
/// Per-bucket accumulators and the batch aggregator
pub mod aggregate;
pub mod article;
pub mod config;
pub mod dedup;
/// Error types for pipeline operations
pub mod error;
/// Plain and gzip file reading
pub mod file_reader;
pub mod listing;
pub mod loader;
pub mod partition;
pub mod pipeline;
pub mod pool;
pub mod queue;
pub mod report;
pub mod sort;
pub mod stats;
pub mod top;

#[cfg(test)]
mod test_support;

// Re-exports for Rust consumers

pub use crate::article::{Article, Timestamp};
pub use crate::config::PipelineConfig;
pub use crate::error::{NewsError, Result};
pub use crate::pipeline::PipelineOutcome;
pub use crate::pool::WorkerPool;
pub use crate::report::Report;
pub use crate::stats::{Phase, PipelineStats};

// Version information
/// Library version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
