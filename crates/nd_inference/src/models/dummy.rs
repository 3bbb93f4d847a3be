use async_trait::async_trait;
use nd_core::summarize::Summarizer;
use nd_core::Result;

/// Offline stand-in: echoes the first words of the content. Used by tests
/// and `--summarizer dummy` dry runs.
pub struct DummySummarizer;

#[async_trait]
impl Summarizer for DummySummarizer {
    async fn summarize(
        &self,
        _instruction: &str,
        content: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String> {
        let words: Vec<&str> = content.split_whitespace().take(20).collect();
        Ok(words.join(" "))
    }
}
