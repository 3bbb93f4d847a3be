use std::collections::HashMap;
use std::sync::Arc;

use nd_core::config::{DigestConfig, SummarizerConfig};
use nd_core::summarize::Summarizer;
use nd_core::types::truncate_chars;
use tracing::{info, warn};

use crate::grouper::SourceGroup;

/// Stands in for a summary when no article in the group had fetchable content.
pub const NO_CONTENT_FALLBACK: &str = "No article content available.";
/// Stands in for a summary when the summarizer call failed.
pub const UNAVAILABLE_FALLBACK: &str = "AI summary unavailable.";

const LEGO_NEWS_PROMPT: &str = "You are an enthusiastic LEGO journalist writing for a LEGO magazine. \nWrite a natural, engaging summary as if reporting the latest news to fellow LEGO fans. \nMention specific set numbers, themes, or builders when relevant. \nWrite in a storytelling style with personality. Keep under 1500 characters.";

const DATA_SCIENCE_PROMPT: &str = "You are a data science expert writing a briefing for colleagues. \nExplain the key insights and methodologies in a clear, natural way. \nWrite as if discussing these articles over coffee with a peer. \nBe conversational yet informative. Keep under 1500 characters.";

const TECH_PROMPT: &str = "You are a tech industry analyst writing for tech professionals. \nSummarize trends and developments in a conversational yet insightful tone. \nWrite as if explaining to an interested colleague. Keep under 1500 characters.";

const GENERIC_PROMPT: &str = "You are an expert journalist. Write a natural summary as if reporting \nfor a publication. Be engaging and informative. Keep under 1500 characters.";

fn instruction_for(category: &str) -> &'static str {
    match category {
        "LEGO News" => LEGO_NEWS_PROMPT,
        "Data Science" => DATA_SCIENCE_PROMPT,
        "Tech" => TECH_PROMPT,
        _ => GENERIC_PROMPT,
    }
}

/// Produces one summary per non-empty group, with a per-category expert
/// tone. Total by construction: a group without content never reaches the
/// summarizer, and a failed call degrades to fallback text instead of
/// failing the digest.
pub struct SummaryOrchestrator {
    summarizer: Arc<dyn Summarizer>,
    digest: DigestConfig,
    settings: SummarizerConfig,
}

impl SummaryOrchestrator {
    pub fn new(
        summarizer: Arc<dyn Summarizer>,
        digest: DigestConfig,
        settings: SummarizerConfig,
    ) -> Self {
        Self {
            summarizer,
            digest,
            settings,
        }
    }

    pub async fn summarize_groups(&self, groups: &[SourceGroup]) -> HashMap<String, String> {
        let mut summaries = HashMap::new();
        for group in groups {
            if group.is_empty() {
                continue;
            }
            info!("🤖 Generating AI summary for {}...", group.category);
            summaries.insert(group.category.clone(), self.summarize_group(group).await);
        }
        summaries
    }

    async fn summarize_group(&self, group: &SourceGroup) -> String {
        let mut articles_text = String::new();
        let mut article_list = String::new();
        for (i, article) in group
            .articles
            .iter()
            .take(self.digest.max_articles_per_source)
            .enumerate()
        {
            let index = i + 1;
            if let Some(content) = article.content.as_deref().filter(|c| !c.is_empty()) {
                articles_text.push_str(&format!(
                    "\n\n--- Article {}: {} ---\n{}",
                    index,
                    article.title,
                    truncate_chars(content, 1000)
                ));
            }
            article_list.push_str(&format!("\n{}. {}", index, article.title));
        }

        if articles_text.is_empty() {
            return NO_CONTENT_FALLBACK.to_string();
        }

        let content = format!(
            "Summarize these {} articles:\n{}\n\nArticle titles:{}",
            group.category, articles_text, article_list
        );
        match self
            .summarizer
            .summarize(
                instruction_for(&group.category),
                &content,
                self.settings.max_tokens,
                self.settings.temperature,
            )
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                warn!("⚠️ Summarizer error for {}: {}", group.category, e);
                UNAVAILABLE_FALLBACK.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouper::DigestArticle;
    use async_trait::async_trait;
    use nd_core::{Error, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSummarizer {
        calls: AtomicUsize,
        last_instruction: Mutex<String>,
        last_content: Mutex<String>,
        fail: bool,
    }

    #[async_trait]
    impl Summarizer for RecordingSummarizer {
        async fn summarize(
            &self,
            instruction: &str,
            content: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_instruction.lock().unwrap() = instruction.to_string();
            *self.last_content.lock().unwrap() = content.to_string();
            if self.fail {
                return Err(Error::Summarize("model offline".to_string()));
            }
            Ok("A tidy summary.".to_string())
        }
    }

    fn group(category: &str, articles: Vec<DigestArticle>) -> SourceGroup {
        SourceGroup {
            category: category.to_string(),
            articles,
        }
    }

    fn article(title: &str, content: Option<&str>) -> DigestArticle {
        DigestArticle {
            title: title.to_string(),
            url: format!("https://example.com/{}", title),
            content: content.map(String::from),
        }
    }

    fn orchestrator(summarizer: Arc<RecordingSummarizer>) -> SummaryOrchestrator {
        SummaryOrchestrator::new(
            summarizer,
            DigestConfig::default(),
            SummarizerConfig::default(),
        )
    }

    #[tokio::test]
    async fn every_nonempty_group_gets_a_summary() {
        let summarizer = Arc::new(RecordingSummarizer::default());
        let orchestrator = orchestrator(summarizer.clone());

        let groups = vec![
            group("Tech", vec![article("One", Some("body text"))]),
            group("Data Science", vec![]),
            group("LEGO News", vec![article("Two", Some("more body"))]),
        ];
        let summaries = orchestrator.summarize_groups(&groups).await;

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries["Tech"], "A tidy summary.");
        assert_eq!(summaries["LEGO News"], "A tidy summary.");
        assert!(!summaries.contains_key("Data Science"));
    }

    #[tokio::test]
    async fn groups_without_content_skip_the_summarizer() {
        let summarizer = Arc::new(RecordingSummarizer::default());
        let orchestrator = orchestrator(summarizer.clone());

        let groups = vec![group(
            "Tech",
            vec![article("One", None), article("Two", Some(""))],
        )];
        let summaries = orchestrator.summarize_groups(&groups).await;

        assert_eq!(summaries["Tech"], NO_CONTENT_FALLBACK);
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn summarizer_errors_degrade_to_fallback_text() {
        let summarizer = Arc::new(RecordingSummarizer {
            fail: true,
            ..RecordingSummarizer::default()
        });
        let orchestrator = orchestrator(summarizer.clone());

        let groups = vec![group("Tech", vec![article("One", Some("body"))])];
        let summaries = orchestrator.summarize_groups(&groups).await;

        assert_eq!(summaries["Tech"], UNAVAILABLE_FALLBACK);
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn instructions_match_the_category_tone() {
        let summarizer = Arc::new(RecordingSummarizer::default());
        let orchestrator = orchestrator(summarizer.clone());

        let groups = vec![group("LEGO News", vec![article("Castle", Some("bricks"))])];
        orchestrator.summarize_groups(&groups).await;
        assert!(summarizer
            .last_instruction
            .lock()
            .unwrap()
            .starts_with("You are an enthusiastic LEGO journalist"));

        let groups = vec![group("Gardening", vec![article("Roses", Some("petals"))])];
        orchestrator.summarize_groups(&groups).await;
        assert!(summarizer
            .last_instruction
            .lock()
            .unwrap()
            .starts_with("You are an expert journalist"));
    }

    #[tokio::test]
    async fn content_blob_lists_numbered_articles_and_truncates_bodies() {
        let summarizer = Arc::new(RecordingSummarizer::default());
        let orchestrator = orchestrator(summarizer.clone());

        let long_body = "x".repeat(1500);
        let groups = vec![group(
            "Tech",
            vec![
                article("First", Some(long_body.as_str())),
                article("Second", None),
            ],
        )];
        orchestrator.summarize_groups(&groups).await;

        let content = summarizer.last_content.lock().unwrap().clone();
        assert!(content.starts_with("Summarize these Tech articles:\n"));
        assert!(content.contains("--- Article 1: First ---"));
        assert!(!content.contains("--- Article 2"));
        assert!(content.contains("\nArticle titles:\n1. First\n2. Second"));
        assert!(content.contains(&"x".repeat(1000)));
        assert!(!content.contains(&"x".repeat(1001)));
    }

    #[tokio::test]
    async fn only_the_first_ten_articles_are_summarized() {
        let summarizer = Arc::new(RecordingSummarizer::default());
        let orchestrator = orchestrator(summarizer.clone());

        let articles: Vec<DigestArticle> = (1..=12)
            .map(|i| article(&format!("Story {}", i), Some("body")))
            .collect();
        let groups = vec![group("Tech", articles)];
        orchestrator.summarize_groups(&groups).await;

        let content = summarizer.last_content.lock().unwrap().clone();
        assert!(content.contains("--- Article 10: Story 10 ---"));
        assert!(!content.contains("--- Article 11"));
        assert!(!content.contains("11. Story 11"));
    }
}
