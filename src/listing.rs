//! Listing files: the article path listing and the auxiliary input lists
//!
//! Both formats start with a count line `K` followed by at least `K` entry
//! lines. Article listing entries are paths relative to the listing file's
//! own directory.
//!
//! Auxiliary list files are recognised by name (case-insensitive):
//!
//! | file name contains | fills                      |
//! |--------------------|----------------------------|
//! | `languages`        | [`AuxiliaryInputs::languages`]     |
//! | `categories`       | [`AuxiliaryInputs::categories`]    |
//! | `english_linking`  | [`AuxiliaryInputs::linking_words`] |
//!
//! Any other file is ignored.

use crate::error::{NewsError, Result};
use crate::file_reader;
use crate::partition::chunk_range;
use crate::pool::{split_results, WorkerPool};
use log::{info, warn};
use rustc_hash::FxHashSet;
use std::path::{Component, Path, PathBuf};

/// Which auxiliary list a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxKind {
    Languages,
    Categories,
    LinkingWords,
}

impl AuxKind {
    /// Classify by file name; `None` means the file is not an auxiliary list
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        if name.contains("languages") {
            Some(AuxKind::Languages)
        } else if name.contains("categories") {
            Some(AuxKind::Categories)
        } else if name.contains("english_linking") {
            Some(AuxKind::LinkingWords)
        } else {
            None
        }
    }

    fn phase(&self) -> &'static str {
        match self {
            AuxKind::Languages => "aux-languages",
            AuxKind::Categories => "aux-categories",
            AuxKind::LinkingWords => "aux-linking-words",
        }
    }
}

/// Contents of the auxiliary input lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuxiliaryInputs {
    pub languages: Vec<String>,
    pub categories: Vec<String>,
    /// English words excluded from keyword counting
    pub linking_words: FxHashSet<String>,
}

fn parse_count(path: &Path, first: Option<&str>) -> Result<usize> {
    let line = first.ok_or_else(|| {
        NewsError::Listing(format!("{}: missing count line", path.display()))
    })?;
    line.trim().parse::<usize>().map_err(|e| {
        NewsError::Listing(format!(
            "{}: invalid count line '{}': {}",
            path.display(),
            line.trim(),
            e
        ))
    })
}

/// Lexically normalize a path: drop `.` and fold `name/..` pairs
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve the article listing at `path` into normalized shard paths
///
/// Fails if the file cannot be read, the count line is missing or malformed,
/// or fewer than `K` entry lines follow it. Blank entry lines are skipped.
pub fn read_listing(path: &Path) -> Result<Vec<PathBuf>> {
    let content = file_reader::read_to_string(path)
        .map_err(|e| NewsError::Listing(format!("cannot read {}: {}", path.display(), e)))?;
    let lines: Vec<&str> = content.lines().collect();
    let count = parse_count(path, lines.first().copied())?;

    let entries = &lines[1..];
    if entries.len() < count {
        return Err(NewsError::Listing(format!(
            "{}: declares {} entries but only {} follow",
            path.display(),
            count,
            entries.len()
        )));
    }

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(entries[..count]
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|relative| normalize_path(&base.join(relative)))
        .collect())
}

/// Load every auxiliary list named in `paths`
///
/// Each file's entries are split across the pool with the static chunk
/// partition. Unreadable files are skipped with a warning; a malformed count
/// line is fatal.
pub fn load_auxiliary_inputs(pool: &WorkerPool, paths: &[PathBuf]) -> Result<AuxiliaryInputs> {
    let mut inputs = AuxiliaryInputs::default();

    for path in paths {
        let Some(kind) = AuxKind::from_path(path) else {
            info!("Ignoring auxiliary file {}", path.display());
            continue;
        };

        let content = match file_reader::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Read error: {}: {}", path.display(), e);
                continue;
            }
        };
        let lines: Vec<&str> = content.lines().collect();
        let declared = parse_count(path, lines.first().copied())?;
        let entries = &lines[1..];
        let count = if declared > entries.len() {
            warn!(
                "{} declares {} entries but only {} follow",
                path.display(),
                declared,
                entries.len()
            );
            entries.len()
        } else {
            declared
        };

        let workers = pool.workers();
        let results = pool.run(kind.phase(), |id| {
            entries[chunk_range(count, workers, id)]
                .iter()
                .map(|entry| entry.trim().to_string())
                .collect::<Vec<String>>()
        });
        let (chunks, _) = split_results(results);
        let values = chunks.into_iter().flatten();

        match kind {
            AuxKind::Languages => inputs.languages = values.collect(),
            AuxKind::Categories => inputs.categories = values.collect(),
            AuxKind::LinkingWords => inputs.linking_words.extend(values),
        }
    }

    info!(
        "Auxiliary inputs: {} languages, {} categories, {} linking words",
        inputs.languages.len(),
        inputs.categories.len(),
        inputs.linking_words.len()
    );
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::num::NonZeroUsize;

    fn pool(n: usize) -> WorkerPool {
        WorkerPool::new(NonZeroUsize::new(n).unwrap()).unwrap()
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path(Path::new("/data/run/./../shards/a.json")),
            PathBuf::from("/data/shards/a.json")
        );
        assert_eq!(
            normalize_path(Path::new("../x/./y")),
            PathBuf::from("../x/y")
        );
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn test_read_listing_resolves_against_listing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let listing = dir.path().join("articles.txt");
        fs::write(&listing, "3\n./a/one.json\n\n../b/two.json\nextra.json\n").unwrap();

        let paths = read_listing(&listing).unwrap();
        assert_eq!(
            paths,
            vec![
                normalize_path(&dir.path().join("a/one.json")),
                normalize_path(&dir.path().join("../b/two.json")),
            ]
        );
    }

    #[test]
    fn test_read_listing_errors_are_listing_errors() {
        let dir = tempfile::tempdir().unwrap();

        let bad = dir.path().join("bad.txt");
        fs::write(&bad, "three\na.json\n").unwrap();
        assert!(matches!(read_listing(&bad), Err(NewsError::Listing(_))));

        let empty = dir.path().join("empty.txt");
        fs::write(&empty, "").unwrap();
        assert!(matches!(read_listing(&empty), Err(NewsError::Listing(_))));

        let short = dir.path().join("short.txt");
        fs::write(&short, "4\na.json\n").unwrap();
        assert!(matches!(read_listing(&short), Err(NewsError::Listing(_))));

        assert!(matches!(
            read_listing(&dir.path().join("absent.txt")),
            Err(NewsError::Listing(_))
        ));
    }

    #[test]
    fn test_aux_kind_from_path() {
        assert_eq!(
            AuxKind::from_path(Path::new("in/Languages.txt")),
            Some(AuxKind::Languages)
        );
        assert_eq!(
            AuxKind::from_path(Path::new("CATEGORIES_v2.txt")),
            Some(AuxKind::Categories)
        );
        assert_eq!(
            AuxKind::from_path(Path::new("english_linking_words.txt")),
            Some(AuxKind::LinkingWords)
        );
        assert_eq!(AuxKind::from_path(Path::new("readme.txt")), None);
    }

    #[test]
    fn test_load_auxiliary_inputs_keeps_order_across_workers() {
        let dir = tempfile::tempdir().unwrap();
        let languages = dir.path().join("languages.txt");
        fs::write(&languages, "5\nenglish\nfrench\ngerman\nspanish\nitalian\n").unwrap();
        let linking = dir.path().join("english_linking_words.txt");
        fs::write(&linking, "3\nthe\nand\nof\n").unwrap();
        let other = dir.path().join("notes.txt");
        fs::write(&other, "not a count\n").unwrap();

        let inputs =
            load_auxiliary_inputs(&pool(3), &[languages, linking, other]).unwrap();

        assert_eq!(
            inputs.languages,
            vec!["english", "french", "german", "spanish", "italian"]
        );
        assert!(inputs.categories.is_empty());
        assert_eq!(inputs.linking_words.len(), 3);
        assert!(inputs.linking_words.contains("the"));
    }

    #[test]
    fn test_load_auxiliary_inputs_more_workers_than_lines() {
        let dir = tempfile::tempdir().unwrap();
        let categories = dir.path().join("categories.txt");
        fs::write(&categories, "2\nSports\nArts, Culture\n").unwrap();

        let inputs = load_auxiliary_inputs(&pool(8), &[categories]).unwrap();
        assert_eq!(inputs.categories, vec!["Sports", "Arts, Culture"]);
    }

    #[test]
    fn test_load_auxiliary_inputs_bad_count_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let categories = dir.path().join("categories.txt");
        fs::write(&categories, "lots\nSports\n").unwrap();
        assert!(load_auxiliary_inputs(&pool(2), &[categories]).is_err());
    }

    #[test]
    fn test_load_auxiliary_inputs_skips_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("languages.txt");
        let inputs = load_auxiliary_inputs(&pool(2), &[missing]).unwrap();
        assert!(inputs.languages.is_empty());
    }
}
