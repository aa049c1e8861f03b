//! Article records and the shard parser
//!
//! A shard file holds JSON article objects in any of three layouts: a single
//! object, an array of objects, or several objects concatenated back to back.
//! Unknown fields are ignored. `uuid` and `published` are required; every
//! other field falls back to empty when missing or `null`.

use crate::error::{NewsError, Result};
use crate::file_reader;
use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Publication instant of an article
///
/// Ordering and equality compare instants, so `10:00Z` and `12:00+02:00`
/// are the same timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Timestamp(dt)
    }
}

impl FromStr for Timestamp {
    type Err = NewsError;

    /// Accepts RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.f]` read as UTC
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Timestamp(dt));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Timestamp(naive.and_utc().fixed_offset()))
            .map_err(|e| NewsError::Parse(format!("invalid timestamp '{}': {}", s, e)))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One news article
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Article {
    /// Identity key, globally unique in a clean corpus
    pub uuid: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default)]
    pub author: Option<String>,

    pub published: Timestamp,

    #[serde(default)]
    pub language: Option<String>,

    /// May repeat the same category
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

/// Parse every article object in a shard's content
///
/// Non-object values at the top level (or inside a top-level array) are
/// skipped. Any malformed article object fails the whole shard.
pub fn parse_articles(content: &str) -> Result<Vec<Article>> {
    let mut articles = Vec::new();

    for value in serde_json::Deserializer::from_str(content).into_iter::<Value>() {
        match value? {
            Value::Array(items) => {
                for item in items {
                    if item.is_object() {
                        articles.push(serde_json::from_value(item)?);
                    }
                }
            }
            obj @ Value::Object(_) => articles.push(serde_json::from_value(obj)?),
            _ => {}
        }
    }

    Ok(articles)
}

/// Read and parse one shard file
pub fn read_article_file(path: &Path) -> Result<Vec<Article>> {
    let content = file_reader::read_to_string(path)
        .map_err(|e| NewsError::Io(format!("{}: {}", path.display(), e)))?;
    parse_articles(&content).map_err(|e| match e {
        NewsError::Parse(msg) => NewsError::Parse(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: &str = r#"{
        "uuid": "u-1",
        "title": "Markets rally",
        "author": "Ann Lee",
        "published": "2024-03-01T10:00:00Z",
        "language": "english",
        "categories": ["Business", "Business", "World"],
        "text": "Stocks rose.",
        "url": "https://example.com/1",
        "thread": {"site": "example.com"}
    }"#;

    #[test]
    fn test_single_object() {
        let articles = parse_articles(ONE).unwrap();
        assert_eq!(articles.len(), 1);
        let a = &articles[0];
        assert_eq!(a.uuid, "u-1");
        assert_eq!(a.author.as_deref(), Some("Ann Lee"));
        assert_eq!(a.categories, vec!["Business", "Business", "World"]);
        assert_eq!(a.published.to_string(), "2024-03-01T10:00:00Z");
    }

    #[test]
    fn test_array_and_concatenated_layouts() {
        let array = format!("[{}, {}]", ONE, ONE.replace("u-1", "u-2"));
        assert_eq!(parse_articles(&array).unwrap().len(), 2);

        let concatenated = format!("{}\n{}\n", ONE, ONE.replace("u-1", "u-3"));
        let articles = parse_articles(&concatenated).unwrap();
        assert_eq!(articles[1].uuid, "u-3");
    }

    #[test]
    fn test_nulls_and_missing_fields() {
        let json = r#"{"uuid": "x", "title": null, "categories": null,
                       "published": "2024-01-01T00:00:00"}"#;
        let articles = parse_articles(json).unwrap();
        let a = &articles[0];
        assert_eq!(a.title, "");
        assert!(a.categories.is_empty());
        assert!(a.author.is_none());
        assert!(a.language.is_none());
        assert_eq!(a.published.to_string(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_missing_uuid_is_an_error() {
        let json = r#"[{"title": "no id", "published": "2024-01-01T00:00:00Z"}]"#;
        assert!(matches!(parse_articles(json), Err(NewsError::Parse(_))));
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(parse_articles("{not json").is_err());
    }

    #[test]
    fn test_empty_content() {
        assert!(parse_articles("").unwrap().is_empty());
        assert!(parse_articles("[]").unwrap().is_empty());
    }

    #[test]
    fn test_timestamp_compares_instants() {
        let utc: Timestamp = "2024-05-01T10:00:00Z".parse().unwrap();
        let shifted: Timestamp = "2024-05-01T12:00:00+02:00".parse().unwrap();
        let later: Timestamp = "2024-05-01T10:00:01Z".parse().unwrap();
        assert_eq!(utc, shifted);
        assert!(later > utc);
        assert_eq!(shifted.to_string(), "2024-05-01T12:00:00+02:00");
    }

    #[test]
    fn test_invalid_timestamp() {
        assert!("yesterday".parse::<Timestamp>().is_err());
    }
}
