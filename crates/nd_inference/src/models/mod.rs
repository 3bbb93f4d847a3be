pub mod dummy;
pub mod openai;

pub use dummy::DummySummarizer;
pub use openai::OpenAiSummarizer;

use std::sync::Arc;

use nd_core::config::{require_env, SummarizerConfig};
use nd_core::summarize::Summarizer;
use nd_core::{Error, Result};

/// Build a summarizer backend by name: "openai" (key from OPENAI_API_KEY,
/// missing key is fatal) or "dummy" (offline echo).
pub fn create_summarizer(kind: &str, config: &SummarizerConfig) -> Result<Arc<dyn Summarizer>> {
    match kind {
        "openai" => {
            let api_key = require_env("OPENAI_API_KEY")?;
            Ok(Arc::new(OpenAiSummarizer::new(api_key, config)?))
        }
        "dummy" => Ok(Arc::new(DummySummarizer)),
        other => Err(Error::Summarize(format!("Unknown summarizer: {}", other))),
    }
}
