use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Article, Digest};
use crate::Result;

/// Which date property the digest window filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    #[default]
    ScrapedAt,
    PublishedAt,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Check whether an article with this exact URL already exists
    async fn contains_url(&self, url: &str) -> Result<bool>;

    /// Create a new article record
    async fn create_article(&self, article: &Article) -> Result<()>;

    /// Fetch articles whose date field is at or after `since`, with a
    /// non-empty category, sorted by category ascending
    async fn find_recent(&self, field: DateField, since: DateTime<Utc>) -> Result<Vec<Article>>;

    /// Persist a composed digest, returning its location
    async fn publish_digest(&self, digest: &Digest) -> Result<String>;
}
