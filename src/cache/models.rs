//! Data models for the response cache

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata tagged onto a cache entry at insertion time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_type: Option<String>,
    /// Cost of the call this entry memoizes, in dollars
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    /// Token count of the memoized response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u64>,
}

/// A single cached response
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub data: serde_json::Value,
    /// Wall-clock insertion time, for stats and eviction ordering
    pub inserted_at: DateTime<Utc>,
    /// Monotonic insertion time, for expiry (immune to clock jumps)
    pub(crate) created: Instant,
    pub ttl: Duration,
    pub metadata: CacheMetadata,
}

impl CacheEntry {
    pub(crate) fn new(
        key: String,
        data: serde_json::Value,
        ttl: Duration,
        metadata: CacheMetadata,
    ) -> Self {
        Self {
            key,
            data,
            inserted_at: Utc::now(),
            created: Instant::now(),
            ttl,
            metadata,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created.elapsed() > self.ttl
    }

    /// Rough in-memory footprint: serialized JSON length of the whole
    /// entry (key, data, metadata) doubled, a UTF-16-ish upper bound.
    /// Same approximation the stats report uses.
    pub fn approx_size(&self) -> usize {
        let metadata_len = serde_json::to_string(&self.metadata).map_or(0, |s| s.len());
        (self.key.len() + self.data.to_string().len() + metadata_len) * 2
    }
}

/// Fields hashed into a cache key by [`super::generate_key`]
///
/// Any difference in any field produces a different key.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyOptions {
    pub platform: Option<String>,
    pub user_id: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub prompt_type: Option<String>,
}

/// AND-filter over entry metadata; unset fields match everything
#[derive(Debug, Clone, Default)]
pub struct MetadataFilter {
    pub platform: Option<String>,
    pub user_id: Option<String>,
    pub prompt_type: Option<String>,
}

impl MetadataFilter {
    pub(crate) fn matches(&self, metadata: &CacheMetadata) -> bool {
        if let Some(platform) = &self.platform {
            if metadata.platform.as_deref() != Some(platform.as_str()) {
                return false;
            }
        }
        if let Some(user_id) = &self.user_id {
            if metadata.user_id.as_deref() != Some(user_id.as_str()) {
                return false;
            }
        }
        if let Some(prompt_type) = &self.prompt_type {
            if metadata.prompt_type.as_deref() != Some(prompt_type.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Snapshot of cache health
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_entries: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    /// hits / (hits + misses); 0 before any access
    pub hit_rate: f64,
    /// Approximate total size in bytes
    pub total_size: usize,
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}

/// Estimated spend avoided by cache hits
///
/// The average cost comes from the entries currently cached, while hits
/// count all accesses since the last clear, so this conflates the two
/// populations. A rough signal, not an accounting figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSavings {
    pub total_hits: u64,
    pub estimated_savings: f64,
    pub average_cost_per_request: f64,
}
