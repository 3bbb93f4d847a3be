use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single news article as it exists in the document store.
///
/// `category` is the configured group label the digest pipeline keys on;
/// `source` is the display name of the feed the article came from. The store
/// persists only the category (its "Source" property), so articles read back
/// from the store carry the category in both fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub source: String,
    pub category: String,
    pub summary: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub scraped_at: DateTime<Utc>,
    pub status: ReadStatus,
}

/// Read state of a stored article. Ingestion always writes `Unread`;
/// the other states are set by whoever reads the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReadStatus {
    #[default]
    Unread,
    Read,
    Archived,
}

impl ReadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadStatus::Unread => "Unread",
            ReadStatus::Read => "Read",
            ReadStatus::Archived => "Archived",
        }
    }

    /// Unrecognized labels fall back to `Unread`.
    pub fn parse(label: &str) -> ReadStatus {
        match label {
            "Read" => ReadStatus::Read,
            "Archived" => ReadStatus::Archived,
            _ => ReadStatus::Unread,
        }
    }
}

/// One element of a composed digest. Every render target consumes this
/// same sequence of tagged variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    Divider,
    LinkList { links: Vec<Link> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub title: String,
    pub url: String,
}

/// A fully composed digest, ready to hand to a document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Digest {
    pub title: String,
    pub icon: String,
    pub generated_at: DateTime<Utc>,
    pub total_articles: usize,
    pub blocks: Vec<Block>,
}

/// Truncate to at most `max` characters, on a character boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("🧱🧱🧱", 2), "🧱🧱");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn read_status_round_trips_labels() {
        assert_eq!(ReadStatus::Unread.as_str(), "Unread");
        assert_eq!(ReadStatus::parse("Read"), ReadStatus::Read);
        assert_eq!(ReadStatus::parse("Archived"), ReadStatus::Archived);
        assert_eq!(ReadStatus::parse("whatever"), ReadStatus::Unread);
        assert_eq!(ReadStatus::default(), ReadStatus::Unread);
    }
}
