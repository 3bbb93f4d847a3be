use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use nd_core::config::Config;
use nd_core::feeds::ContentFetcher;
use nd_core::store::DocumentStore;
use nd_core::summarize::Summarizer;
use nd_core::Result;
use tracing::{info, warn};

use crate::compose::DigestComposer;
use crate::grouper::{SourceGroup, WindowedGrouper};
use crate::summary::SummaryOrchestrator;
use crate::topics::HotTopicDetector;

/// One digest run end to end: window query, grouping, content enrichment,
/// summaries, hot topics, composition, publication. Every stage degrades
/// instead of aborting; only store access and publication can fail the run.
pub struct DigestPipeline {
    store: Arc<dyn DocumentStore>,
    fetcher: Arc<dyn ContentFetcher>,
    summarizer: Option<Arc<dyn Summarizer>>,
    config: Config,
}

impl DigestPipeline {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        fetcher: Arc<dyn ContentFetcher>,
        summarizer: Option<Arc<dyn Summarizer>>,
        config: Config,
    ) -> Self {
        Self {
            store,
            fetcher,
            summarizer,
            config,
        }
    }

    /// Returns the published digest location, or `None` when the window was
    /// empty and the create flag is off.
    pub async fn run(&self) -> Result<Option<String>> {
        let digest_config = &self.config.digest;
        info!(
            "🚀 Starting digest run: timezone {}, lookback {} hours",
            digest_config.timezone, digest_config.lookback_hours
        );

        let now = Utc::now().with_timezone(&digest_config.timezone);
        let grouper = WindowedGrouper::new(self.store.clone(), digest_config.clone());
        let mut groups = grouper.collect(now).await?;
        let total: usize = groups.iter().map(|g| g.articles.len()).sum();
        for group in &groups {
            info!("  - {}: {}", group.category, group.articles.len());
        }

        if total == 0 && !digest_config.create_if_no_articles {
            info!("⚠️ No articles. Skipping.");
            return Ok(None);
        }

        let ai_mode = digest_config.ai_summary_enabled && self.summarizer.is_some();
        if ai_mode {
            self.fetch_contents(&mut groups).await;
        }

        let summaries = match (&self.summarizer, ai_mode) {
            (Some(summarizer), true) => {
                info!("🤖 Generating AI summaries...");
                SummaryOrchestrator::new(
                    summarizer.clone(),
                    digest_config.clone(),
                    self.config.summarizer.clone(),
                )
                .summarize_groups(&groups)
                .await
            }
            _ => HashMap::new(),
        };

        let hot_topics = if digest_config.hot_topics_enabled {
            let topics = HotTopicDetector::new(digest_config.hot_topic_threshold).detect(&groups);
            if !topics.is_empty() {
                let preview: Vec<&str> = topics.iter().take(5).map(String::as_str).collect();
                info!("🔥 Hot: {}", preview.join(", "));
            }
            topics
        } else {
            Vec::new()
        };

        info!("📝 Creating digest...");
        let digest = DigestComposer::new(digest_config.clone()).compose(
            now,
            &groups,
            &hot_topics,
            &summaries,
            ai_mode,
        );
        let location = self.store.publish_digest(&digest).await?;
        info!("✅ Done! {}", location);
        Ok(Some(location))
    }

    /// Fetch body text for every grouped article. A failed fetch leaves the
    /// article without content; summarization falls back accordingly.
    async fn fetch_contents(&self, groups: &mut [SourceGroup]) {
        for group in groups {
            for article in &mut group.articles {
                if article.url.is_empty() {
                    continue;
                }
                match self.fetcher.fetch_text(&article.url).await {
                    Ok(text) => article.content = Some(text),
                    Err(e) => warn!("⚠️ Failed to fetch {}: {}", article.url, e),
                }
            }
        }
    }
}
