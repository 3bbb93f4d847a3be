use async_trait::async_trait;

use crate::Result;

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a summary of `content`, guided by a system `instruction`
    async fn summarize(
        &self,
        instruction: &str,
        content: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String>;
}
