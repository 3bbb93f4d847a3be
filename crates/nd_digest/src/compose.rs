use std::collections::HashMap;

use chrono::DateTime;
use chrono_tz::Tz;
use nd_core::config::DigestConfig;
use nd_core::types::{Block, Digest, Link};

use crate::grouper::SourceGroup;

/// Character ceiling for a single paragraph block. The rendering surface
/// rejects overlong rich text, this leaves headroom under its 2000 limit.
const PARAGRAPH_CEILING: usize = 1900;

/// Assembles grouped articles, hot topics and summaries into the ordered
/// block sequence every render target consumes.
pub struct DigestComposer {
    config: DigestConfig,
}

impl DigestComposer {
    pub fn new(config: DigestConfig) -> Self {
        Self { config }
    }

    pub fn compose(
        &self,
        now: DateTime<Tz>,
        groups: &[SourceGroup],
        hot_topics: &[String],
        summaries: &HashMap<String, String>,
        ai_mode: bool,
    ) -> Digest {
        let today = now.format("%B %d, %Y").to_string();
        let (title, icon) = if ai_mode {
            (format!("🤖 AI News Digest - {}", today), "🤖")
        } else {
            (format!("Daily News - {}", today), "📰")
        };

        let rendered: Vec<&SourceGroup> = groups
            .iter()
            .filter(|group| !(self.config.skip_empty_sources && group.is_empty()))
            .collect();
        let total: usize = groups.iter().map(|g| g.articles.len()).sum();

        let mut blocks = Vec::new();

        if !hot_topics.is_empty() {
            blocks.push(Block::Heading {
                level: 2,
                text: "🔥 Hot Topics Today".to_string(),
            });
            let topics_line = hot_topics
                .iter()
                .take(5)
                .map(|topic| format!("**{}**", capitalize(topic)))
                .collect::<Vec<_>>()
                .join(", ");
            blocks.push(Block::Paragraph { text: topics_line });
            blocks.push(Block::Divider);
        }

        blocks.push(Block::Heading {
            level: 2,
            text: "📊 Overview".to_string(),
        });
        blocks.push(Block::Paragraph {
            text: format!("Total Articles: {}", total),
        });
        for group in &rendered {
            blocks.push(Block::Paragraph {
                text: format!(
                    "{} {}: {} articles",
                    self.config.source_emoji(&group.category),
                    group.category,
                    group.articles.len()
                ),
            });
        }
        blocks.push(Block::Divider);

        for group in &rendered {
            blocks.push(Block::Heading {
                level: 2,
                text: format!(
                    "{} {}",
                    self.config.source_emoji(&group.category),
                    group.category
                ),
            });

            if let Some(summary) = summaries.get(&group.category) {
                for paragraph in summary.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
                    for chunk in split_paragraph(paragraph, PARAGRAPH_CEILING) {
                        blocks.push(Block::Paragraph { text: chunk });
                    }
                }
            }

            if !group.articles.is_empty() {
                blocks.push(Block::Paragraph {
                    text: "\n📎 Read the full articles:".to_string(),
                });
                let links = group
                    .articles
                    .iter()
                    .take(self.config.max_articles_per_source)
                    .map(|article| Link {
                        title: article.title.clone(),
                        url: article.url.clone(),
                    })
                    .collect();
                blocks.push(Block::LinkList { links });
            }

            blocks.push(Block::Divider);
        }

        Digest {
            title,
            icon: icon.to_string(),
            generated_at: now.with_timezone(&chrono::Utc),
            total_articles: total,
            blocks,
        }
    }
}

/// Split a paragraph at sentence boundaries so no chunk exceeds the ceiling,
/// accumulating greedily. Rejoining the chunks with ". " reconstructs the
/// paragraph exactly. A single sentence longer than the ceiling is emitted
/// as its own oversized chunk rather than cut mid-sentence.
pub fn split_paragraph(paragraph: &str, ceiling: usize) -> Vec<String> {
    if paragraph.len() <= ceiling {
        return vec![paragraph.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    for sentence in paragraph.split(". ") {
        if !current.is_empty() && current.len() + 2 + sentence.len() > ceiling {
            chunks.push(std::mem::take(&mut current));
        }
        if current.is_empty() {
            current.push_str(sentence);
        } else {
            current.push_str(". ");
            current.push_str(sentence);
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
