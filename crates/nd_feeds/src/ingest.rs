use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use nd_core::config::Config;
use nd_core::feeds::FeedFetcher;
use nd_core::store::DocumentStore;
use nd_core::types::truncate_chars;
use nd_core::{Article, Result};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::dedup::{DedupGate, DedupVerdict};
use crate::normalize::normalize_entry;

/// Counters for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub added: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Pulls every configured feed, normalizes the entries and writes the new
/// ones to the store. Two phases, both strictly sequential: collect all
/// articles first, then write them one at a time. The configured delays
/// space out feed fetches and store writes.
pub struct Ingestor {
    store: Arc<dyn DocumentStore>,
    fetcher: Arc<dyn FeedFetcher>,
    config: Config,
}

impl Ingestor {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        fetcher: Arc<dyn FeedFetcher>,
        config: Config,
    ) -> Self {
        Self {
            store,
            fetcher,
            config,
        }
    }

    pub async fn run(&self) -> Result<IngestReport> {
        let articles = self.collect_articles().await;
        info!("📊 Total articles: {}", articles.len());

        info!("💾 Writing to store...");
        let gate = DedupGate::new(self.store.clone());
        let mut report = IngestReport::default();

        for article in &articles {
            match gate.check(&article.url).await {
                DedupVerdict::Duplicate => {
                    info!("⏭️ Skipping duplicate: {}", article.url);
                    report.skipped += 1;
                }
                DedupVerdict::New | DedupVerdict::CheckFailed => {
                    match self.store.create_article(article).await {
                        Ok(()) => {
                            info!("✓ Added: {}...", truncate_chars(&article.title, 50));
                            report.added += 1;
                        }
                        Err(e) => {
                            warn!("✗ Failed to store {}: {}", article.url, e);
                            report.failed += 1;
                        }
                    }
                }
            }
            sleep(Duration::from_millis(self.config.ingest.write_delay_ms)).await;
        }

        info!(
            "✨ Ingest finished: {} added, {} skipped, {} failed",
            report.added, report.skipped, report.failed
        );
        Ok(report)
    }

    /// Fetch and normalize all feeds. A feed that fails to fetch or parse is
    /// logged and skipped; the remaining feeds are still processed.
    async fn collect_articles(&self) -> Vec<Article> {
        let mut articles = Vec::new();
        for feed in &self.config.feeds {
            info!("📡 Fetching feed: {}", feed.name);
            match self.fetcher.fetch(&feed.url).await {
                Ok(entries) => {
                    let before = articles.len();
                    let scraped_at = Utc::now();
                    for entry in entries.iter().take(self.config.ingest.max_entries_per_feed) {
                        if let Some(article) = normalize_entry(entry, feed, scraped_at) {
                            articles.push(article);
                        }
                    }
                    info!("  ✓ Found {} articles", articles.len() - before);
                }
                Err(e) => warn!("  ✗ Failed to fetch {}: {}", feed.name, e),
            }
            sleep(Duration::from_millis(self.config.ingest.feed_delay_ms)).await;
        }
        articles
    }
}
