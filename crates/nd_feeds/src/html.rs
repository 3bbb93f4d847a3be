use std::time::Duration;

use async_trait::async_trait;
use nd_core::feeds::ContentFetcher;
use nd_core::types::truncate_chars;
use nd_core::Result;
use scraper::Html;

/// How much page text the summarizer gets to see per article.
const MAX_PAGE_CHARS: usize = 3000;

/// Strip markup from a fragment of feed HTML, collapsing whitespace.
pub fn clean_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    collapse_whitespace(&text)
}

/// Extract readable text from a full HTML document, skipping script and
/// style subtrees.
pub fn extract_page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut chunks: Vec<&str> = Vec::new();
    for node in document.tree.nodes() {
        if let Some(text) = node.value().as_text() {
            let skipped = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map(|element| matches!(element.name(), "script" | "style"))
                    .unwrap_or(false)
            });
            if !skipped {
                chunks.push(text);
            }
        }
    }
    collapse_whitespace(&chunks.join(" "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fetches article pages for summarization. Bounded output; a page that
/// will not load within 10 seconds is a fetch error, not a hang.
pub struct HttpContentFetcher {
    client: reqwest::Client,
}

impl HttpContentFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0")
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        let text = extract_page_text(&body);
        Ok(truncate_chars(&text, MAX_PAGE_CHARS).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_html_strips_tags_and_collapses_whitespace() {
        assert_eq!(
            clean_html("<p>Some   <b>bold</b>\n text</p>"),
            "Some bold text"
        );
        assert_eq!(clean_html(""), "");
        assert_eq!(clean_html("plain text"), "plain text");
    }

    #[test]
    fn extract_page_text_skips_script_and_style() {
        let html = r#"<html><head>
            <style>body { color: red; }</style>
            <script>var tracking = "nope";</script>
        </head><body>
            <h1>Headline</h1>
            <p>Body copy here.</p>
            <script>more();</script>
        </body></html>"#;

        let text = extract_page_text(html);
        assert_eq!(text, "Headline Body copy here.");
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color"));
    }
}
