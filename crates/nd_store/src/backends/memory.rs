use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nd_core::store::{DateField, DocumentStore};
use nd_core::types::{Article, Digest};
use nd_core::Result;
use tokio::sync::RwLock;

/// In-process store used by tests and `--store memory` dry runs. Implements
/// the same query semantics the pipeline relies on from the real backend:
/// at-or-after window filtering, non-empty category, category sort.
#[derive(Default, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    articles: Vec<Article>,
    digests: Vec<Digest>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored article
    pub async fn articles(&self) -> Vec<Article> {
        self.inner.read().await.articles.clone()
    }

    /// Snapshot of every published digest
    pub async fn digests(&self) -> Vec<Digest> {
        self.inner.read().await.digests.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn contains_url(&self, url: &str) -> Result<bool> {
        Ok(self
            .inner
            .read()
            .await
            .articles
            .iter()
            .any(|article| article.url == url))
    }

    async fn create_article(&self, article: &Article) -> Result<()> {
        self.inner.write().await.articles.push(article.clone());
        Ok(())
    }

    async fn find_recent(&self, field: DateField, since: DateTime<Utc>) -> Result<Vec<Article>> {
        let inner = self.inner.read().await;
        let mut matches: Vec<Article> = inner
            .articles
            .iter()
            .filter(|article| !article.category.is_empty())
            .filter(|article| match field {
                DateField::ScrapedAt => article.scraped_at >= since,
                DateField::PublishedAt => {
                    article.published_at.map(|p| p >= since).unwrap_or(false)
                }
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(matches)
    }

    async fn publish_digest(&self, digest: &Digest) -> Result<String> {
        let mut inner = self.inner.write().await;
        inner.digests.push(digest.clone());
        Ok(format!("memory://digest/{}", inner.digests.len()))
    }
}
