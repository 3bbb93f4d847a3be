use std::time::Duration;

use async_trait::async_trait;
use nd_core::config::IngestConfig;
use nd_core::feeds::{FeedEntry, FeedFetcher};
use nd_core::{Error, Result};

/// Feed client: a plain GET with the configured user agent and timeout,
/// parsed by feed-rs (RSS and Atom both).
pub struct HttpFeedFetcher {
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    pub fn new(config: &IngestConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        parse_feed(&body)
    }
}

/// Parse raw feed bytes into entries. Entry dates are carried as RFC 3339
/// strings; normalization decides what to do with them.
pub fn parse_feed(xml: &[u8]) -> Result<Vec<FeedEntry>> {
    let feed = feed_rs::parser::parse(xml).map_err(|e| Error::Feed(e.to_string()))?;
    let entries = feed
        .entries
        .into_iter()
        .map(|entry| FeedEntry {
            title: entry.title.map(|t| t.content),
            link: entry.links.first().map(|l| l.href.clone()),
            published: entry.published.or(entry.updated).map(|d| d.to_rfc3339()),
            summary: entry
                .summary
                .map(|t| t.content)
                .or_else(|| entry.content.and_then(|c| c.body)),
        })
        .collect();
    Ok(entries)
}
