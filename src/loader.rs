//! Article load phase: pool workers drain a queue of shard paths

use crate::article::{read_article_file, Article};
use crate::pool::{split_results, WorkerPool};
use crate::queue::WorkQueue;
use log::{debug, warn};
use std::path::PathBuf;

/// Records and bookkeeping from the load phase
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// All records, in no particular order
    pub articles: Vec<Article>,
    pub files_read: usize,
    pub files_failed: usize,
    pub tasks_failed: usize,
}

#[derive(Default)]
struct LocalLoad {
    articles: Vec<Article>,
    files_read: usize,
    files_failed: usize,
}

/// Parse every shard in `paths` using all pool workers
///
/// A shard that cannot be read or parsed is logged and skipped; the worker
/// moves on to its next claim. The combined record order depends on which
/// worker claimed which shard and must not be relied on.
pub fn load_articles(pool: &WorkerPool, paths: Vec<PathBuf>) -> LoadOutcome {
    let queue = WorkQueue::from_items(paths);

    let results = pool.run("load", |worker| {
        let mut local = LocalLoad::default();
        while let Some(path) = queue.claim() {
            match read_article_file(&path) {
                Ok(articles) => {
                    debug!(
                        "worker {} read {} articles from {}",
                        worker,
                        articles.len(),
                        path.display()
                    );
                    local.files_read += 1;
                    local.articles.extend(articles);
                }
                Err(e) => {
                    warn!("Skipping article file: {}", e);
                    local.files_failed += 1;
                }
            }
        }
        local
    });

    let (locals, failures) = split_results(results);
    let mut outcome = LoadOutcome {
        tasks_failed: failures.len(),
        ..LoadOutcome::default()
    };
    for local in locals {
        outcome.files_read += local.files_read;
        outcome.files_failed += local.files_failed;
        outcome.articles.extend(local.articles);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::num::NonZeroUsize;

    fn article_json(uuid: &str) -> String {
        format!(
            r#"{{"uuid": "{}", "title": "t-{}", "published": "2024-01-01T00:00:00Z"}}"#,
            uuid, uuid
        )
    }

    #[test]
    fn test_loads_all_shards_and_skips_broken_ones() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for i in 0..6 {
            let path = dir.path().join(format!("shard{}.json", i));
            fs::write(&path, format!("[{}, {}]", article_json(&format!("{}a", i)), article_json(&format!("{}b", i)))).unwrap();
            paths.push(path);
        }
        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ nope").unwrap();
        paths.push(broken);
        paths.push(dir.path().join("missing.json"));

        let pool = WorkerPool::new(NonZeroUsize::new(3).unwrap()).unwrap();
        let outcome = load_articles(&pool, paths);

        assert_eq!(outcome.articles.len(), 12);
        assert_eq!(outcome.files_read, 6);
        assert_eq!(outcome.files_failed, 2);
        assert_eq!(outcome.tasks_failed, 0);
    }

    #[test]
    fn test_no_paths() {
        let pool = WorkerPool::new(NonZeroUsize::new(2).unwrap()).unwrap();
        let outcome = load_articles(&pool, Vec::new());
        assert!(outcome.articles.is_empty());
        assert_eq!(outcome.files_read, 0);
    }
}
