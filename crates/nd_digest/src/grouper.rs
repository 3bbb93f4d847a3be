use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use nd_core::config::DigestConfig;
use nd_core::store::DocumentStore;
use nd_core::{Article, Result};
use tracing::{debug, info};

/// An article as the digest pipeline carries it: enough to count, link and
/// summarize. `content` starts empty and is filled in by the pipeline when
/// summaries are on.
#[derive(Debug, Clone)]
pub struct DigestArticle {
    pub title: String,
    pub url: String,
    pub content: Option<String>,
}

/// Every windowed article for one configured category.
#[derive(Debug, Clone)]
pub struct SourceGroup {
    pub category: String,
    pub articles: Vec<DigestArticle>,
}

impl SourceGroup {
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Queries the store for the lookback window and buckets the results by
/// category. Output follows the configured source order, one group per
/// configured category even when empty; categories outside the allow-list
/// are dropped. Groups are complete, the per-source render cap is applied
/// later so overview statistics stay truthful.
pub struct WindowedGrouper {
    store: Arc<dyn DocumentStore>,
    config: DigestConfig,
}

impl WindowedGrouper {
    pub fn new(store: Arc<dyn DocumentStore>, config: DigestConfig) -> Self {
        Self { store, config }
    }

    pub async fn collect(&self, now: DateTime<Tz>) -> Result<Vec<SourceGroup>> {
        let since = (now - Duration::hours(self.config.lookback_hours)).with_timezone(&Utc);
        let articles = self
            .store
            .find_recent(self.config.window_field, since)
            .await?;
        info!(
            "✅ Found {} articles in the last {} hours",
            articles.len(),
            self.config.lookback_hours
        );
        Ok(self.group(articles))
    }

    pub fn group(&self, articles: Vec<Article>) -> Vec<SourceGroup> {
        let mut buckets: HashMap<String, Vec<DigestArticle>> = HashMap::new();
        for article in articles {
            if !self.config.sources.contains(&article.category) {
                debug!("Dropping article outside configured sources: {}", article.url);
                continue;
            }
            buckets
                .entry(article.category.clone())
                .or_default()
                .push(DigestArticle {
                    title: article.title,
                    url: article.url,
                    content: None,
                });
        }

        self.config
            .sources
            .iter()
            .map(|category| SourceGroup {
                category: category.clone(),
                articles: buckets.remove(category).unwrap_or_default(),
            })
            .collect()
    }
}
