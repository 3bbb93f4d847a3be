use std::sync::Arc;

use nd_core::store::DocumentStore;
use tracing::warn;

/// Outcome of the duplicate check for one URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupVerdict {
    /// The store already has this URL
    Duplicate,
    /// The store has never seen this URL
    New,
    /// The store could not be asked; treated downstream like `New`
    CheckFailed,
}

/// Exact-URL duplicate check against the store. The gate fails open: a
/// check error yields `CheckFailed` and the article is ingested anyway.
pub struct DedupGate {
    store: Arc<dyn DocumentStore>,
}

impl DedupGate {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn check(&self, url: &str) -> DedupVerdict {
        match self.store.contains_url(url).await {
            Ok(true) => DedupVerdict::Duplicate,
            Ok(false) => DedupVerdict::New,
            Err(e) => {
                warn!("⚠️ Dedup check failed for {}, proceeding as new: {}", url, e);
                DedupVerdict::CheckFailed
            }
        }
    }
}
