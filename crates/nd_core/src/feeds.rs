use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A single feed entry, fields as the feed provided them. Dates stay raw
/// strings here; normalization decides what parses and what is dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub summary: Option<String>,
}

#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch a feed URL and parse it into entries
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>>;
}

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch a page and return its readable body text
    async fn fetch_text(&self, url: &str) -> Result<String>;
}
