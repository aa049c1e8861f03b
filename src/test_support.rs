//! Article fixtures shared by unit tests

use crate::article::{Article, Timestamp};
use chrono::DateTime;

/// Timestamp `secs` seconds after the Unix epoch, UTC
pub fn ts(secs: i64) -> Timestamp {
    DateTime::from_timestamp(secs, 0)
        .expect("timestamp in range")
        .fixed_offset()
        .into()
}

/// Minimal article with a distinct title derived from the key
pub fn article(uuid: &str, secs: i64) -> Article {
    Article {
        uuid: uuid.to_string(),
        title: format!("title of {}", uuid),
        author: None,
        published: ts(secs),
        language: None,
        categories: Vec::new(),
        text: None,
        url: format!("https://news.example/{}", uuid),
    }
}
