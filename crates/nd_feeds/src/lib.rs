pub mod client;
pub mod dedup;
pub mod html;
pub mod ingest;
pub mod normalize;

pub use client::HttpFeedFetcher;
pub use dedup::{DedupGate, DedupVerdict};
pub use html::HttpContentFetcher;
pub use ingest::{IngestReport, Ingestor};
