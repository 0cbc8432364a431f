//! Codereview Core - Core library for repository code review
//!
//! This crate walks a remote repository tree, aggregates its files, asks a
//! language model to review them and memoizes both remote stages behind a
//! TTL cache.

pub mod analysis;
pub mod cache;
pub mod config;
pub mod error;
pub mod review;
pub mod secrets;
pub mod source;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use analysis::{AnalysisRequester, AnalysisResult, InferenceBackend, OpenAiBackend};
pub use cache::{build_key, Cache, CacheStore, MemoryStore, RedisStore};
pub use config::{CacheConfig, Config, FetchConfig, GitHubConfig, InferenceConfig, ServerConfig};
pub use error::{Error, Result};
pub use review::{format_response, ReviewOrchestrator, ReviewRequest};
pub use secrets::Secrets;
pub use source::{
    aggregate, list_tree, AggregatedPayload, ContentSource, EntryKind, FileRecord,
    RepositoryReference, TreeEntry,
};
