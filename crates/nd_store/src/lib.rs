use std::sync::Arc;

use nd_core::store::DocumentStore;
use nd_core::{Error, Result};

pub mod backends;

pub use backends::memory::MemoryStore;
pub use backends::notion::{NotionConfig, NotionStore};

/// Build a store backend by name: "notion" (the real thing, configured from
/// the environment) or "memory" (in-process, for tests and dry runs).
pub fn create_store(kind: &str) -> Result<Arc<dyn DocumentStore>> {
    match kind {
        "notion" => Ok(Arc::new(NotionStore::from_env()?)),
        "memory" => Ok(Arc::new(MemoryStore::new())),
        other => Err(Error::Store(format!("Unknown store backend: {}", other))),
    }
}
