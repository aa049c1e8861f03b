//! End-to-end pipeline
//!
//! ```text
//! listings ─► auxiliary lists ─► load shards ─► dedup ─► sort ─► aggregate ─► top-N ─► write
//! ```
//!
//! Every phase runs on the same [`WorkerPool`] and is joined before the next
//! one starts. Only the fatal cases return `Err`: an unreadable or malformed
//! listing, a malformed auxiliary count line, or a pool that cannot be built.

use crate::aggregate::aggregate;
use crate::config::PipelineConfig;
use crate::dedup::deduplicate;
use crate::error::Result;
use crate::listing::{load_auxiliary_inputs, read_listing, AuxiliaryInputs};
use crate::loader::load_articles;
use crate::pool::WorkerPool;
use crate::report::{write_outputs, Report};
use crate::sort::{sort_articles, SortStrategy};
use crate::stats::{Phase, PipelineStats};
use crate::top::TopSelections;
use log::info;
use std::path::Path;

/// Everything a run produced besides the files it wrote
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub report: Report,
    pub auxiliary: AuxiliaryInputs,
    pub stats: PipelineStats,
}

/// Run the whole pipeline and write every artifact into the output directory
pub fn run(
    config: &PipelineConfig,
    articles_listing: &Path,
    inputs_listing: &Path,
) -> Result<PipelineOutcome> {
    let pool = WorkerPool::new(config.workers)?;
    let mut stats = PipelineStats::new();
    info!("Starting pipeline with {} workers", config.worker_count());

    let (article_paths, aux_paths) = stats.time(Phase::Listing, || -> Result<_> {
        Ok((read_listing(articles_listing)?, read_listing(inputs_listing)?))
    })?;
    stats.files_listed = article_paths.len();

    let auxiliary = stats.time(Phase::Auxiliary, || load_auxiliary_inputs(&pool, &aux_paths))?;

    let loaded = stats.time(Phase::Load, || load_articles(&pool, article_paths));
    stats.files_read = loaded.files_read;
    stats.files_failed = loaded.files_failed;
    stats.records_loaded = loaded.articles.len();
    stats.tasks_failed += loaded.tasks_failed;
    info!(
        "Loaded {} records from {} files ({} failed)",
        loaded.articles.len(),
        loaded.files_read,
        loaded.files_failed
    );
    let corpus = loaded.articles;

    let dedup = stats.time(Phase::Dedup, || deduplicate(&pool, &corpus));
    stats.unique_records = dedup.unique.len();
    stats.duplicates = dedup.duplicates;
    stats.tasks_failed += dedup.tasks_failed;
    let duplicates = dedup.duplicates;
    let mut unique = dedup.unique;

    let strategy = stats.time(Phase::Sort, || sort_articles(&pool, &mut unique));
    stats.sort_fallback = strategy == SortStrategy::SequentialFallback;

    let aggregated = stats.time(Phase::Aggregate, || {
        aggregate(&pool, &unique, &auxiliary.linking_words)
    });
    stats.batches_claimed = aggregated.batches_claimed;
    stats.tasks_failed += aggregated.tasks_failed;

    let report = Report {
        duplicates,
        unique: unique.len(),
        top: TopSelections::select(&aggregated.accumulators, &unique),
    };

    let output = stats.time(Phase::Output, || {
        write_outputs(
            &pool,
            &config.output_dir,
            &unique,
            aggregated.accumulators,
            &report,
        )
    });
    stats.outputs_written = output.files_written;
    stats.outputs_failed = output.files_failed;
    stats.tasks_failed += output.tasks_failed;

    info!("Pipeline finished in {:.2?}", stats.total_time());
    Ok(PipelineOutcome {
        report,
        auxiliary,
        stats,
    })
}
