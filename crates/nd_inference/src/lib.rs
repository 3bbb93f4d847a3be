pub mod models;

pub use models::{create_summarizer, DummySummarizer, OpenAiSummarizer};
