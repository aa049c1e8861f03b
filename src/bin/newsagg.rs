mod cli_utils;

use anyhow::{Context, Result};
use clap::Parser;
use newsagg::{pipeline, PipelineConfig};
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "newsagg")]
#[command(
    about = "Deduplicate, order and summarize a sharded news article corpus",
    long_about = "newsagg - Parallel news article aggregator\n\n\
    Loads every JSON article shard named by ARTICLES, drops articles whose uuid or\n\
    title occurs more than once, orders the rest newest first and writes per-category,\n\
    per-language and English keyword statistics plus a summary report.\n\n\
    Both listing files start with an entry count followed by one path per line,\n\
    relative to the listing file itself.\n\n\
    Examples:\n\
      newsagg 4 articles.txt inputs.txt\n\
      newsagg 8 data/articles.txt data/inputs.txt -o out --stats"
)]
#[command(version)]
struct Cli {
    /// Number of worker threads (positive integer)
    #[arg(value_name = "WORKERS")]
    workers: NonZeroUsize,

    /// Listing of article shard files
    #[arg(value_name = "ARTICLES")]
    articles: PathBuf,

    /// Listing of auxiliary input files (languages, categories, linking words)
    #[arg(value_name = "INPUTS")]
    inputs: PathBuf,

    /// Directory receiving the output files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Show per-stage statistics on stderr
    #[arg(short, long)]
    stats: bool,

    /// Log progress at info level (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = PipelineConfig::new(cli.workers).with_output_dir(&cli.output_dir);
    let outcome = pipeline::run(&config, &cli.articles, &cli.inputs).with_context(|| {
        format!(
            "Failed to process {} with {}",
            cli.articles.display(),
            cli.inputs.display()
        )
    })?;

    if cli.stats {
        cli_utils::print_stats(&outcome);
    }
    Ok(())
}
