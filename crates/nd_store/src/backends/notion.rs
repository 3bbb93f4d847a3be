use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nd_core::config::require_env;
use nd_core::store::{DateField, DocumentStore};
use nd_core::types::{Article, Block, Digest, ReadStatus};
use nd_core::{Error, Result};
use serde_json::{json, Value};
use tracing::{debug, info};

const NOTION_API: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Connection settings for the Notion-backed store.
#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub token: String,
    pub database_id: String,
    /// Parent page digests are created under.
    pub parent_page_id: String,
}

impl NotionConfig {
    /// Read all three secrets from the environment. Any missing one is a
    /// fatal configuration error, so a misconfigured run dies before it
    /// touches the store.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            token: require_env("NOTION_TOKEN")?,
            database_id: require_env("NOTION_DATABASE_ID")?,
            parent_page_id: require_env("NOTION_PARENT_PAGE_ID")?,
        })
    }
}

/// The real document store. One database row per article; digests are pages
/// created under the configured parent page.
pub struct NotionStore {
    client: reqwest::Client,
    config: NotionConfig,
}

impl NotionStore {
    pub fn new(config: NotionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(NotionConfig::from_env()?)
    }

    async fn post(&self, url: &str, payload: &Value) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(payload)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Store(format!(
                "Notion API returned {}: {}",
                status, body
            )));
        }
        Ok(response.json().await?)
    }

    async fn query_database(&self, payload: &Value) -> Result<Value> {
        let url = format!("{}/databases/{}/query", NOTION_API, self.config.database_id);
        self.post(&url, payload).await
    }
}

#[async_trait]
impl DocumentStore for NotionStore {
    async fn contains_url(&self, url: &str) -> Result<bool> {
        let payload = json!({
            "filter": { "property": "URL", "url": { "equals": url } },
            "page_size": 1
        });
        let response = self.query_database(&payload).await?;
        Ok(response["results"]
            .as_array()
            .map(|results| !results.is_empty())
            .unwrap_or(false))
    }

    async fn create_article(&self, article: &Article) -> Result<()> {
        let payload = json!({
            "parent": { "database_id": self.config.database_id },
            "properties": article_properties(article),
        });
        self.post(&format!("{}/pages", NOTION_API), &payload).await?;
        Ok(())
    }

    async fn find_recent(&self, field: DateField, since: DateTime<Utc>) -> Result<Vec<Article>> {
        let payload = json!({
            "filter": {
                "and": [
                    {
                        "property": date_property(field),
                        "date": { "on_or_after": since.to_rfc3339() }
                    },
                    {
                        "property": "Source",
                        "select": { "is_not_empty": true }
                    }
                ]
            },
            "sorts": [{ "property": "Source", "direction": "ascending" }]
        });
        let response = self.query_database(&payload).await?;

        let mut articles = Vec::new();
        if let Some(results) = response["results"].as_array() {
            for page in results {
                match parse_page(page) {
                    Some(article) => articles.push(article),
                    None => debug!("Skipping store record without usable properties"),
                }
            }
        }
        Ok(articles)
    }

    async fn publish_digest(&self, digest: &Digest) -> Result<String> {
        let payload = json!({
            "parent": { "page_id": self.config.parent_page_id },
            "icon": { "type": "emoji", "emoji": digest.icon },
            "properties": {
                "title": { "title": [{ "text": { "content": digest.title } }] }
            },
            "children": render_blocks(&digest.blocks),
        });
        let response = self.post(&format!("{}/pages", NOTION_API), &payload).await?;
        let location = response["url"].as_str().unwrap_or_default().to_string();
        info!("✨ Digest page created: {}", location);
        Ok(location)
    }
}

fn date_property(field: DateField) -> &'static str {
    match field {
        DateField::ScrapedAt => "Scraped Date",
        DateField::PublishedAt => "Published Date",
    }
}

/// Build the page property map for an article. The property names are the
/// store schema shared with every other consumer of the database; they must
/// not change.
pub fn article_properties(article: &Article) -> Value {
    let mut properties = json!({
        "Title": { "title": [{ "text": { "content": article.title } }] },
        "URL": { "url": article.url },
        "Source": { "select": { "name": article.category } },
        "Scraped Date": { "date": { "start": article.scraped_at.to_rfc3339() } },
        "Status": { "select": { "name": article.status.as_str() } },
    });
    if let Some(published) = &article.published_at {
        properties["Published Date"] = json!({ "date": { "start": published.to_rfc3339() } });
    }
    if let Some(summary) = &article.summary {
        properties["Summary"] = json!({ "rich_text": [{ "text": { "content": summary } }] });
    }
    properties
}

/// Read an Article back out of a query result page. Records missing a URL or
/// a parseable scraped date are unusable and yield `None`.
pub fn parse_page(page: &Value) -> Option<Article> {
    let properties = page.get("properties")?;

    let url = properties["URL"]["url"].as_str()?.to_string();
    let title = properties["Title"]["title"]
        .as_array()
        .and_then(|parts| parts.first())
        .and_then(|part| part["plain_text"].as_str())
        .unwrap_or("Untitled")
        .to_string();
    let category = properties["Source"]["select"]["name"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    let scraped_at = properties["Scraped Date"]["date"]["start"]
        .as_str()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())?
        .with_timezone(&Utc);
    let published_at = properties["Published Date"]["date"]["start"]
        .as_str()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.with_timezone(&Utc));
    let summary = properties["Summary"]["rich_text"]
        .as_array()
        .and_then(|parts| parts.first())
        .and_then(|part| part["plain_text"].as_str())
        .map(str::to_string);
    let status = properties["Status"]["select"]["name"]
        .as_str()
        .map(ReadStatus::parse)
        .unwrap_or_default();

    Some(Article {
        url,
        title,
        source: category.clone(),
        category,
        summary,
        published_at,
        scraped_at,
        status,
    })
}

/// Render digest blocks into Notion block objects.
pub fn render_blocks(blocks: &[Block]) -> Vec<Value> {
    let mut children = Vec::new();
    for block in blocks {
        match block {
            Block::Heading { level, text } => children.push(render_heading(*level, text)),
            Block::Paragraph { text } => children.push(json!({
                "object": "block",
                "type": "paragraph",
                "paragraph": {
                    "rich_text": [{ "type": "text", "text": { "content": text } }]
                }
            })),
            Block::Divider => children.push(json!({
                "object": "block",
                "type": "divider",
                "divider": {}
            })),
            Block::LinkList { links } => {
                for link in links {
                    children.push(json!({
                        "object": "block",
                        "type": "bulleted_list_item",
                        "bulleted_list_item": {
                            "rich_text": [{
                                "type": "text",
                                "text": {
                                    "content": link.title,
                                    "link": { "url": link.url }
                                }
                            }]
                        }
                    }));
                }
            }
        }
    }
    children
}

fn render_heading(level: u8, text: &str) -> Value {
    let kind = match level {
        1 => "heading_1",
        2 => "heading_2",
        _ => "heading_3",
    };
    let mut block = json!({ "object": "block", "type": kind });
    block[kind] = json!({
        "rich_text": [{ "type": "text", "text": { "content": text } }]
    });
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use nd_core::types::Link;

    fn article() -> Article {
        Article {
            url: "https://example.com/a".to_string(),
            title: "A headline".to_string(),
            source: "Brothers Brick".to_string(),
            category: "LEGO News".to_string(),
            summary: Some("A short summary".to_string()),
            published_at: Some("2024-01-05T09:00:00Z".parse().unwrap()),
            scraped_at: "2024-01-05T10:00:00Z".parse().unwrap(),
            status: ReadStatus::Unread,
        }
    }

    #[test]
    fn construction_requires_every_notion_secret() {
        std::env::set_var("NOTION_TOKEN", "secret-token");
        std::env::set_var("NOTION_DATABASE_ID", "db-123");
        std::env::remove_var("NOTION_PARENT_PAGE_ID");

        let err = NotionConfig::from_env().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("NOTION_PARENT_PAGE_ID"));

        std::env::set_var("NOTION_PARENT_PAGE_ID", "page-456");
        let config = NotionConfig::from_env().unwrap();
        assert_eq!(config.parent_page_id, "page-456");
    }

    #[test]
    fn article_properties_use_the_store_schema_names() {
        let properties = article_properties(&article());
        let keys: Vec<&str> = properties.as_object().unwrap().keys().map(String::as_str).collect();

        for expected in [
            "Title",
            "URL",
            "Source",
            "Scraped Date",
            "Status",
            "Published Date",
            "Summary",
        ] {
            assert!(keys.contains(&expected), "missing property {}", expected);
        }

        assert_eq!(properties["Source"]["select"]["name"], "LEGO News");
        assert_eq!(properties["Status"]["select"]["name"], "Unread");
        assert_eq!(properties["URL"]["url"], "https://example.com/a");
        assert_eq!(
            properties["Title"]["title"][0]["text"]["content"],
            "A headline"
        );
    }

    #[test]
    fn optional_properties_are_omitted_when_absent() {
        let mut bare = article();
        bare.summary = None;
        bare.published_at = None;

        let properties = article_properties(&bare);
        let map = properties.as_object().unwrap();
        assert!(!map.contains_key("Summary"));
        assert!(!map.contains_key("Published Date"));
        assert!(map.contains_key("Scraped Date"));
    }

    #[test]
    fn parse_page_round_trips_query_results() {
        let page = json!({
            "properties": {
                "Title": { "title": [{ "plain_text": "A headline" }] },
                "URL": { "url": "https://example.com/a" },
                "Source": { "select": { "name": "LEGO News" } },
                "Scraped Date": { "date": { "start": "2024-01-05T10:00:00+00:00" } },
                "Published Date": { "date": { "start": "2024-01-05T09:00:00+00:00" } },
                "Summary": { "rich_text": [{ "plain_text": "A short summary" }] },
                "Status": { "select": { "name": "Unread" } }
            }
        });

        let parsed = parse_page(&page).unwrap();
        assert_eq!(parsed.title, "A headline");
        assert_eq!(parsed.url, "https://example.com/a");
        assert_eq!(parsed.category, "LEGO News");
        assert_eq!(parsed.summary.as_deref(), Some("A short summary"));
        assert_eq!(parsed.status, ReadStatus::Unread);
        assert!(parsed.published_at.is_some());
    }

    #[test]
    fn parse_page_rejects_records_without_url() {
        let page = json!({
            "properties": {
                "Title": { "title": [{ "plain_text": "No url" }] },
                "Scraped Date": { "date": { "start": "2024-01-05T10:00:00+00:00" } }
            }
        });
        assert!(parse_page(&page).is_none());
    }

    #[test]
    fn parse_page_defaults_title_and_status() {
        let page = json!({
            "properties": {
                "Title": { "title": [] },
                "URL": { "url": "https://example.com/x" },
                "Source": { "select": { "name": "Tech" } },
                "Scraped Date": { "date": { "start": "2024-01-05T10:00:00+00:00" } }
            }
        });

        let parsed = parse_page(&page).unwrap();
        assert_eq!(parsed.title, "Untitled");
        assert_eq!(parsed.status, ReadStatus::Unread);
        assert!(parsed.summary.is_none());
    }

    #[test]
    fn render_blocks_maps_every_variant() {
        let blocks = vec![
            Block::Heading {
                level: 2,
                text: "🔥 Hot Topics Today".to_string(),
            },
            Block::Paragraph {
                text: "Total Articles: 3".to_string(),
            },
            Block::Divider,
            Block::LinkList {
                links: vec![
                    Link {
                        title: "First".to_string(),
                        url: "https://example.com/1".to_string(),
                    },
                    Link {
                        title: "Second".to_string(),
                        url: "https://example.com/2".to_string(),
                    },
                ],
            },
        ];

        let rendered = render_blocks(&blocks);
        assert_eq!(rendered.len(), 5);

        assert_eq!(rendered[0]["type"], "heading_2");
        assert_eq!(
            rendered[0]["heading_2"]["rich_text"][0]["text"]["content"],
            "🔥 Hot Topics Today"
        );
        assert_eq!(rendered[1]["type"], "paragraph");
        assert_eq!(rendered[2]["type"], "divider");
        assert_eq!(rendered[3]["type"], "bulleted_list_item");
        assert_eq!(
            rendered[3]["bulleted_list_item"]["rich_text"][0]["text"]["link"]["url"],
            "https://example.com/1"
        );
        assert_eq!(
            rendered[4]["bulleted_list_item"]["rich_text"][0]["text"]["content"],
            "Second"
        );
    }

    #[test]
    fn heading_levels_map_to_notion_kinds() {
        let h1 = render_heading(1, "Top");
        let h3 = render_heading(3, "Deep");
        assert_eq!(h1["type"], "heading_1");
        assert!(h1["heading_1"].is_object());
        assert_eq!(h3["type"], "heading_3");
    }
}
