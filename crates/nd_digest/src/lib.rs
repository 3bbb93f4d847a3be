pub mod compose;
pub mod grouper;
pub mod pipeline;
pub mod summary;
pub mod topics;

pub use compose::DigestComposer;
pub use grouper::{DigestArticle, SourceGroup, WindowedGrouper};
pub use pipeline::DigestPipeline;
pub use summary::SummaryOrchestrator;
pub use topics::HotTopicDetector;
