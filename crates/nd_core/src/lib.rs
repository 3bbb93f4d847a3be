pub mod config;
pub mod error;
pub mod feeds;
pub mod store;
pub mod summarize;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::{Article, Block, Digest, Link, ReadStatus};
