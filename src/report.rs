//! Output artifacts
//!
//! | file                 | line format                                  |
//! |----------------------|----------------------------------------------|
//! | `all_articles.txt`   | `<uuid> <published>` in listing order         |
//! | `<category>.txt`     | member uuids, ascending                       |
//! | `<language>.txt`     | member uuids, ascending                       |
//! | `keywords_count.txt` | `<word> <count>`, count desc then word asc    |
//! | `reports.txt`        | the seven `name - value` summary lines        |
//!
//! Category file names have commas removed and whitespace runs replaced by
//! `_`; language file names are lowercased. Existing files are overwritten.
//!
//! Per-bucket files are written in parallel by pool workers draining a
//! queue of write jobs. The fixed artifacts are written afterwards on the
//! calling thread, so a bucket whose file name collides with one of them
//! never survives. A failed write is logged and counted; it never aborts the
//! run.

use crate::aggregate::{Accumulators, CountMap, KeyListMap};
use crate::article::Article;
use crate::error::{NewsError, Result};
use crate::pool::{split_results, WorkerPool};
use crate::queue::WorkQueue;
use crate::top::{Ranked, TopSelections};
use log::{info, warn};
use rayon::slice::ParallelSliceMut;
use rustc_hash::FxHashMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub const ALL_ARTICLES_FILE: &str = "all_articles.txt";
pub const KEYWORDS_FILE: &str = "keywords_count.txt";
pub const REPORT_FILE: &str = "reports.txt";

/// Remove commas and collapse whitespace runs into `_`
pub fn sanitize_category(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.chars().filter(|&c| c != ',') {
        if matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r') {
            if !in_space {
                out.push('_');
                in_space = true;
            }
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// File name of a category bucket
pub fn category_file_name(category: &str) -> String {
    format!("{}.txt", sanitize_category(category))
}

/// File name of a language bucket
pub fn language_file_name(language: &str) -> String {
    format!("{}.txt", language.to_lowercase())
}

/// `all_articles.txt` content
pub fn render_listing(sorted: &[&Article]) -> String {
    let mut out = String::new();
    for article in sorted {
        out.push_str(&article.uuid);
        out.push(' ');
        out.push_str(&article.published.to_string());
        out.push('\n');
    }
    out
}

/// One identity key per line, in the given order
pub fn render_keys(keys: &[String]) -> String {
    let mut out = String::with_capacity(keys.iter().map(|k| k.len() + 1).sum());
    for key in keys {
        out.push_str(key);
        out.push('\n');
    }
    out
}

/// Keywords ordered by count descending, then word ascending
pub fn rank_keywords(pool: &WorkerPool, keywords: &CountMap) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = keywords
        .iter()
        .map(|(word, count)| (word.to_string(), count))
        .collect();
    pool.install(|| {
        ranked.par_sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    });
    ranked
}

/// `keywords_count.txt` content
pub fn render_keywords(ranked: &[(String, usize)]) -> String {
    let mut out = String::new();
    for (word, count) in ranked {
        out.push_str(&format!("{} {}\n", word, count));
    }
    out
}

/// Values rendered into `reports.txt`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub duplicates: usize,
    pub unique: usize,
    pub top: TopSelections,
}

fn ranked_line(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    ranked: Option<&Ranked>,
    rename: impl Fn(&str) -> String,
) -> fmt::Result {
    match ranked {
        Some(r) => writeln!(f, "{} - {} {}", label, rename(&r.name), r.count),
        None => writeln!(f, "{} -  0", label),
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "duplicates_found - {}", self.duplicates)?;
        writeln!(f, "unique_articles - {}", self.unique)?;
        ranked_line(f, "best_author", self.top.author.as_ref(), str::to_string)?;
        ranked_line(f, "top_language", self.top.language.as_ref(), str::to_string)?;
        ranked_line(f, "top_category", self.top.category.as_ref(), sanitize_category)?;
        match &self.top.most_recent {
            Some(recent) => writeln!(f, "most_recent_article - {} {}", recent.published, recent.url)?,
            None => writeln!(f, "most_recent_article - ")?,
        }
        ranked_line(f, "top_keyword_en", self.top.keyword.as_ref(), str::to_string)
    }
}

/// Bookkeeping from the output phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputStats {
    pub files_written: usize,
    pub files_failed: usize,
    pub tasks_failed: usize,
}

impl OutputStats {
    fn note(&mut self, outcome: Result<()>) {
        match outcome {
            Ok(()) => self.files_written += 1,
            Err(e) => {
                warn!("{}", e);
                self.files_failed += 1;
            }
        }
    }
}

/// Create or truncate `path` and write `contents`
pub fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)
        .map_err(|e| NewsError::Output(format!("cannot write {}: {}", path.display(), e)))
}

struct BucketJob {
    file_name: String,
    keys: Vec<String>,
}

/// Group bucket key lists by output file name
///
/// Buckets whose names map to the same file share it, so no two workers ever
/// write the same path.
fn bucket_jobs(categories: KeyListMap, languages: KeyListMap) -> Vec<BucketJob> {
    let mut by_file: FxHashMap<String, Vec<String>> = FxHashMap::default();
    let named = categories
        .into_buckets()
        .into_iter()
        .map(|(name, keys)| (category_file_name(&name), keys))
        .chain(
            languages
                .into_buckets()
                .into_iter()
                .map(|(name, keys)| (language_file_name(&name), keys)),
        );
    for (file_name, keys) in named {
        by_file.entry(file_name).or_default().extend(keys);
    }
    by_file
        .into_iter()
        .map(|(file_name, keys)| BucketJob { file_name, keys })
        .collect()
}

/// Write every artifact into `dir`
pub fn write_outputs(
    pool: &WorkerPool,
    dir: &Path,
    sorted: &[&Article],
    accumulators: Accumulators,
    report: &Report,
) -> OutputStats {
    let mut stats = OutputStats::default();

    if let Err(e) = std::fs::create_dir_all(dir) {
        warn!("cannot create output directory {}: {}", dir.display(), e);
    }

    let Accumulators {
        categories,
        languages,
        keywords,
        ..
    } = accumulators;

    let queue = WorkQueue::from_items(bucket_jobs(categories, languages));
    let results = pool.run("write-buckets", |_| {
        let mut local = OutputStats::default();
        while let Some(mut job) = queue.claim() {
            job.keys.sort_unstable();
            let path: PathBuf = dir.join(&job.file_name);
            local.note(write_artifact(&path, &render_keys(&job.keys)));
        }
        local
    });
    let (locals, failures) = split_results(results);
    stats.tasks_failed += failures.len();
    for local in locals {
        stats.files_written += local.files_written;
        stats.files_failed += local.files_failed;
    }

    stats.note(write_artifact(&dir.join(ALL_ARTICLES_FILE), &render_listing(sorted)));
    let ranked = rank_keywords(pool, &keywords);
    stats.note(write_artifact(&dir.join(KEYWORDS_FILE), &render_keywords(&ranked)));
    stats.note(write_artifact(&dir.join(REPORT_FILE), &report.to_string()));

    info!(
        "Output: {} files written, {} failed in {}",
        stats.files_written,
        stats.files_failed,
        dir.display()
    );
    stats
}
