//! In-process TTL cache for expensive (LLM) responses
//!
//! Purely an optimization layer: a miss means the caller pays for the call
//! again, never a correctness problem. Every operation degrades to a miss
//! rather than returning an error.
//!
//! Call sites share the key space through a naming convention:
//! - `similar:{platform}:{problemId}` for similar-problem lookups
//! - `review:{userId}:{problemId}` for review insights
//! - `suggest:{userId}:{hash}` for suggestion prompts, where `hash` comes
//!   from [`generate_key`] over the preference payload

pub mod janitor;
pub mod manager;
pub mod models;

pub use janitor::CacheJanitor;
pub use manager::{generate_key, CacheManager};
pub use models::{CacheEntry, CacheMetadata, CacheStats, CostSavings, KeyOptions, MetadataFilter};
