use std::collections::HashMap;
use std::path::Path;

use chrono_tz::Tz;
use serde::Deserialize;
use url::Url;

use crate::store::DateField;
use crate::{Error, Result};

/// Runtime configuration, loaded once at startup from a JSON file and passed
/// by reference into every component. Secrets are not part of this file;
/// they come from the environment (see [`require_env`]).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub feeds: Vec<FeedConfig>,
    #[serde(default)]
    pub digest: DigestConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
}

/// One syndication feed to ingest.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Display name of the feed, used in logs
    pub name: String,
    pub url: String,
    /// Group label written to the store; must match the digest allow-list
    /// for the articles to show up in digests
    pub category: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Reporting time zone for window arithmetic and digest dates
    pub timezone: Tz,
    /// Ordered category allow-list; articles outside it are dropped
    pub sources: Vec<String>,
    /// Render-time cap on links and summarized articles per group
    pub max_articles_per_source: usize,
    pub lookback_hours: i64,
    pub window_field: DateField,
    /// Leave zero-article groups out of the digest entirely
    pub skip_empty_sources: bool,
    /// Produce a digest page even when no articles matched the window
    pub create_if_no_articles: bool,
    pub ai_summary_enabled: bool,
    pub hot_topics_enabled: bool,
    /// Minimum keyword occurrences for a hot topic
    pub hot_topic_threshold: usize,
    /// Per-category heading emoji; unknown categories render as 📰
    pub emoji: HashMap<String, String>,
}

impl DigestConfig {
    pub fn source_emoji(&self, category: &str) -> &str {
        self.emoji.get(category).map(String::as_str).unwrap_or("📰")
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Guatemala,
            sources: vec![
                "LEGO News".to_string(),
                "Data Science".to_string(),
                "Tech".to_string(),
            ],
            max_articles_per_source: 10,
            lookback_hours: 24,
            window_field: DateField::ScrapedAt,
            skip_empty_sources: true,
            create_if_no_articles: false,
            ai_summary_enabled: true,
            hot_topics_enabled: true,
            hot_topic_threshold: 3,
            emoji: default_emoji(),
        }
    }
}

fn default_emoji() -> HashMap<String, String> {
    [
        ("LEGO News", "🧱"),
        ("Data Science", "📊"),
        ("Tech", "💻"),
    ]
    .into_iter()
    .map(|(category, emoji)| (category.to_string(), emoji.to_string()))
    .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Newest entries taken from each feed per run
    pub max_entries_per_feed: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Pause between feed fetches
    pub feed_delay_ms: u64,
    /// Pause between store writes
    pub write_delay_ms: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_entries_per_feed: 10,
            request_timeout_secs: 15,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
            feed_delay_ms: 1000,
            write_delay_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

impl Config {
    /// Load and validate configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for feed in &self.feeds {
            Url::parse(&feed.url).map_err(|e| {
                Error::Config(format!("invalid URL for feed '{}': {}", feed.name, e))
            })?;
            if feed.category.is_empty() {
                return Err(Error::Config(format!(
                    "feed '{}' has an empty category",
                    feed.name
                )));
            }
        }
        if self.digest.sources.is_empty() {
            return Err(Error::Config("digest.sources must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Read a required environment variable, failing with a configuration error.
pub fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| Error::Config(format!("{} is not set", name)))
}
