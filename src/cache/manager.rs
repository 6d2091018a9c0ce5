//! Cache manager: keyed TTL map with lazy expiry and hit/miss accounting

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::models::{CacheEntry, CacheMetadata, CacheStats, CostSavings, KeyOptions, MetadataFilter};

/// Default entry lifetime (1 hour)
const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Default capacity before eviction kicks in
const DEFAULT_MAX_SIZE: usize = 1000;

/// Assumed cost per request when no entry carries cost metadata, in dollars
const FALLBACK_COST: f64 = 0.001;

/// Compute a deterministic cache key for a prompt and its options
///
/// SHA-256 over the canonical JSON of prompt + options, truncated to
/// 16 hex characters. Identical inputs always hash to the same key.
pub fn generate_key(prompt: &str, options: &KeyOptions) -> String {
    let payload = serde_json::json!({
        "prompt": prompt,
        "platform": options.platform,
        "userId": options.user_id,
        "temperature": options.temperature,
        "maxTokens": options.max_tokens,
        "promptType": options.prompt_type,
    });

    let mut hasher = Sha256::new();
    hasher.update(payload.to_string().as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    hit_count: u64,
    miss_count: u64,
}

/// In-memory TTL cache keyed by strings from [`generate_key`] or the
/// module-level key conventions
pub struct CacheManager {
    inner: RwLock<CacheInner>,
    max_size: usize,
    default_ttl: Duration,
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheManager {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_SIZE, DEFAULT_TTL)
    }

    pub fn with_capacity(max_size: usize, default_ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(CacheInner {
                entries: HashMap::new(),
                hit_count: 0,
                miss_count: 0,
            }),
            max_size,
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Look up and deserialize a cached value
    ///
    /// An expired entry is removed on the spot and counts as a miss, as does
    /// a value that no longer deserializes to `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut inner = self.inner.write().unwrap();

        let expired = match inner.entries.get(key) {
            None => {
                inner.miss_count += 1;
                return None;
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            inner.entries.remove(key);
            inner.miss_count += 1;
            return None;
        }

        let value = inner
            .entries
            .get(key)
            .and_then(|entry| serde_json::from_value(entry.data.clone()).ok());
        match value {
            Some(v) => {
                inner.hit_count += 1;
                Some(v)
            }
            None => {
                inner.miss_count += 1;
                None
            }
        }
    }

    /// Store a value under a key, with an optional per-entry TTL
    ///
    /// A value that fails to serialize is skipped with a warning; callers
    /// never see an error from the cache.
    pub fn set<T: Serialize>(
        &self,
        key: impl Into<String>,
        value: &T,
        ttl: Option<Duration>,
        metadata: CacheMetadata,
    ) {
        let key = key.into();
        let data = match serde_json::to_value(value) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("Cache: dropping unserializable value for '{}': {}", key, e);
                return;
            }
        };

        let mut inner = self.inner.write().unwrap();

        // Make room before inserting a brand new key
        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.max_size {
            let evicted = evict_oldest(&mut inner.entries, self.max_size);
            log::debug!("Cache: evicted {} oldest entries at capacity", evicted);
        }

        let ttl = ttl.unwrap_or(self.default_ttl);
        inner
            .entries
            .insert(key.clone(), CacheEntry::new(key, data, ttl, metadata));
    }

    /// Existence check with the same lazy-expiry semantics as `get`,
    /// without touching the hit/miss counters
    ///
    /// Check and removal happen under one write lock, so an entry
    /// re-inserted under the same key by another thread is never dropped.
    pub fn has(&self, key: &str) -> bool {
        let mut inner = self.inner.write().unwrap();

        let expired = match inner.entries.get(key) {
            None => return false,
            Some(entry) => entry.is_expired(),
        };

        if expired {
            inner.entries.remove(key);
            return false;
        }
        true
    }

    /// Remove a single entry; returns whether it was present
    pub fn remove(&self, key: &str) -> bool {
        self.inner.write().unwrap().entries.remove(key).is_some()
    }

    /// Drop every entry and reset the hit/miss counters
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.entries.clear();
        inner.hit_count = 0;
        inner.miss_count = 0;
    }

    /// Sweep out every expired entry; returns the number removed
    pub fn cleanup(&self) -> usize {
        let mut inner = self.inner.write().unwrap();
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired());
        before - inner.entries.len()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.read().unwrap();

        let accesses = inner.hit_count + inner.miss_count;
        let hit_rate = if accesses == 0 {
            0.0
        } else {
            inner.hit_count as f64 / accesses as f64
        };

        CacheStats {
            total_entries: inner.entries.len(),
            hit_count: inner.hit_count,
            miss_count: inner.miss_count,
            hit_rate,
            total_size: inner.entries.values().map(|e| e.approx_size()).sum(),
            oldest_entry: inner.entries.values().map(|e| e.inserted_at).min(),
            newest_entry: inner.entries.values().map(|e| e.inserted_at).max(),
        }
    }

    /// Linear scan for entries whose metadata matches the filter
    pub fn entries_by_metadata(&self, filter: &MetadataFilter) -> Vec<CacheEntry> {
        let inner = self.inner.read().unwrap();
        inner
            .entries
            .values()
            .filter(|entry| !entry.is_expired() && filter.matches(&entry.metadata))
            .cloned()
            .collect()
    }

    /// Estimate the spend avoided by hits so far
    pub fn cost_savings(&self) -> CostSavings {
        let inner = self.inner.read().unwrap();

        let costs: Vec<f64> = inner
            .entries
            .values()
            .filter_map(|e| e.metadata.cost)
            .collect();
        let average_cost = if costs.is_empty() {
            FALLBACK_COST
        } else {
            costs.iter().sum::<f64>() / costs.len() as f64
        };

        CostSavings {
            total_hits: inner.hit_count,
            estimated_savings: inner.hit_count as f64 * average_cost,
            average_cost_per_request: average_cost,
        }
    }
}

/// Remove the oldest 10% of entries (at least one) by insertion order
fn evict_oldest(entries: &mut HashMap<String, CacheEntry>, max_size: usize) -> usize {
    let evict_count = (max_size / 10).max(1);

    let mut by_age: Vec<(String, std::time::Instant)> = entries
        .iter()
        .map(|(k, e)| (k.clone(), e.created))
        .collect();
    by_age.sort_by_key(|(_, created)| *created);

    let mut removed = 0;
    for (key, _) in by_age.into_iter().take(evict_count) {
        if entries.remove(&key).is_some() {
            removed += 1;
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn options() -> KeyOptions {
        KeyOptions {
            platform: Some("leetcode".to_string()),
            user_id: Some("u1".to_string()),
            temperature: Some(0.7),
            max_tokens: Some(512),
            prompt_type: Some("similar".to_string()),
        }
    }

    #[test]
    fn test_generate_key_deterministic() {
        let a = generate_key("suggest a problem", &options());
        let b = generate_key("suggest a problem", &options());
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_key_sensitive_to_every_field() {
        let base = generate_key("prompt", &options());

        assert_ne!(base, generate_key("other prompt", &options()));

        let mut opts = options();
        opts.platform = Some("codeforces".to_string());
        assert_ne!(base, generate_key("prompt", &opts));

        let mut opts = options();
        opts.user_id = Some("u2".to_string());
        assert_ne!(base, generate_key("prompt", &opts));

        let mut opts = options();
        opts.temperature = Some(0.8);
        assert_ne!(base, generate_key("prompt", &opts));

        let mut opts = options();
        opts.max_tokens = Some(513);
        assert_ne!(base, generate_key("prompt", &opts));

        let mut opts = options();
        opts.prompt_type = Some("review".to_string());
        assert_ne!(base, generate_key("prompt", &opts));
    }

    #[test]
    fn test_set_get_round_trip() {
        let cache = CacheManager::new();
        cache.set("k1", &vec!["two sum", "three sum"], None, CacheMetadata::default());

        let value: Option<Vec<String>> = cache.get("k1");
        assert_eq!(value, Some(vec!["two sum".to_string(), "three sum".to_string()]));
    }

    #[test]
    fn test_expiry_flips_get_and_has() {
        let cache = CacheManager::new();
        cache.set(
            "short",
            &"value",
            Some(Duration::from_millis(30)),
            CacheMetadata::default(),
        );

        assert!(cache.has("short"));
        thread::sleep(Duration::from_millis(60));

        assert!(!cache.has("short"));
        let value: Option<String> = cache.get("short");
        assert!(value.is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_hit_rate_arithmetic() {
        let cache = CacheManager::new();
        assert_eq!(cache.stats().hit_rate, 0.0);

        cache.set("k", &1u32, None, CacheMetadata::default());
        let _: Option<u32> = cache.get("k"); // hit
        let _: Option<u32> = cache.get("k"); // hit
        let _: Option<u32> = cache.get("missing"); // miss

        let stats = cache.stats();
        assert_eq!(stats.hit_count, 2);
        assert_eq!(stats.miss_count, 1);
        assert!((stats.hit_rate - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_has_never_drops_a_fresh_reinsert() {
        use std::sync::Arc;

        let cache = Arc::new(CacheManager::new());
        cache.set(
            "k",
            &1u32,
            Some(Duration::from_millis(1)),
            CacheMetadata::default(),
        );
        thread::sleep(Duration::from_millis(10));

        // One thread keeps re-inserting a fresh entry under the key while
        // another hammers `has` on it
        let writer_cache = Arc::clone(&cache);
        let writer = thread::spawn(move || {
            for _ in 0..1000 {
                writer_cache.set("k", &2u32, None, CacheMetadata::default());
            }
        });
        for _ in 0..1000 {
            cache.has("k");
        }
        writer.join().unwrap();

        // The last insert is fresh and must have survived every check
        assert!(cache.has("k"));
        assert_eq!(cache.get::<u32>("k"), Some(2));
    }

    #[test]
    fn test_has_does_not_touch_counters() {
        let cache = CacheManager::new();
        cache.set("k", &1u32, None, CacheMetadata::default());

        cache.has("k");
        cache.has("missing");

        let stats = cache.stats();
        assert_eq!(stats.hit_count, 0);
        assert_eq!(stats.miss_count, 0);
    }

    #[test]
    fn test_clear_resets_counters() {
        let cache = CacheManager::new();
        cache.set("k", &1u32, None, CacheMetadata::default());
        let _: Option<u32> = cache.get("k");

        cache.clear();

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.hit_count, 0);
        assert_eq!(stats.miss_count, 0);
        assert!(stats.oldest_entry.is_none());
    }

    #[test]
    fn test_eviction_at_capacity() {
        let cache = CacheManager::with_capacity(20, DEFAULT_TTL);
        for i in 0..20 {
            cache.set(format!("k{}", i), &i, None, CacheMetadata::default());
        }
        assert_eq!(cache.len(), 20);

        cache.set("one-more", &99, None, CacheMetadata::default());

        // At least floor(20 * 0.1) = 2 oldest entries evicted
        assert!(cache.len() <= 19);
        assert!(!cache.has("k0"));
        assert!(!cache.has("k1"));
        assert!(cache.has("one-more"));
        assert!(cache.has("k19"));
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let cache = CacheManager::with_capacity(5, DEFAULT_TTL);
        for i in 0..5 {
            cache.set(format!("k{}", i), &i, None, CacheMetadata::default());
        }

        cache.set("k4", &42, None, CacheMetadata::default());

        assert_eq!(cache.len(), 5);
        assert_eq!(cache.get::<i32>("k4"), Some(42));
        assert!(cache.has("k0"));
    }

    #[test]
    fn test_cleanup_returns_removed_count() {
        let cache = CacheManager::new();
        cache.set("a", &1u32, Some(Duration::from_millis(20)), CacheMetadata::default());
        cache.set("b", &2u32, Some(Duration::from_millis(20)), CacheMetadata::default());
        cache.set("c", &3u32, None, CacheMetadata::default());

        thread::sleep(Duration::from_millis(50));

        assert_eq!(cache.cleanup(), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.has("c"));
    }

    #[test]
    fn test_entries_by_metadata_and_filter() {
        let cache = CacheManager::new();
        cache.set(
            "similar:leetcode:1",
            &"a",
            None,
            CacheMetadata {
                platform: Some("leetcode".to_string()),
                user_id: Some("u1".to_string()),
                prompt_type: Some("similar".to_string()),
                ..Default::default()
            },
        );
        cache.set(
            "similar:codeforces:5",
            &"b",
            None,
            CacheMetadata {
                platform: Some("codeforces".to_string()),
                user_id: Some("u1".to_string()),
                prompt_type: Some("similar".to_string()),
                ..Default::default()
            },
        );

        let by_user = cache.entries_by_metadata(&MetadataFilter {
            user_id: Some("u1".to_string()),
            ..Default::default()
        });
        assert_eq!(by_user.len(), 2);

        let by_both = cache.entries_by_metadata(&MetadataFilter {
            user_id: Some("u1".to_string()),
            platform: Some("leetcode".to_string()),
            ..Default::default()
        });
        assert_eq!(by_both.len(), 1);
        assert_eq!(by_both[0].key, "similar:leetcode:1");
    }

    #[test]
    fn test_cost_savings_fallback_and_mean() {
        let cache = CacheManager::new();
        cache.set("k", &1u32, None, CacheMetadata::default());
        let _: Option<u32> = cache.get("k");
        let _: Option<u32> = cache.get("k");

        // No recorded costs: fallback average
        let savings = cache.cost_savings();
        assert_eq!(savings.total_hits, 2);
        assert!((savings.average_cost_per_request - 0.001).abs() < f64::EPSILON);

        cache.set(
            "priced",
            &2u32,
            None,
            CacheMetadata {
                cost: Some(0.01),
                ..Default::default()
            },
        );
        cache.set(
            "priced2",
            &3u32,
            None,
            CacheMetadata {
                cost: Some(0.03),
                ..Default::default()
            },
        );

        let savings = cache.cost_savings();
        assert!((savings.average_cost_per_request - 0.02).abs() < 1e-9);
        assert!((savings.estimated_savings - 0.04).abs() < 1e-9);
    }

    #[test]
    fn test_stats_oldest_and_newest() {
        let cache = CacheManager::new();
        cache.set("first", &1u32, None, CacheMetadata::default());
        thread::sleep(Duration::from_millis(5));
        cache.set("second", &2u32, None, CacheMetadata::default());

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 2);
        assert!(stats.oldest_entry.unwrap() <= stats.newest_entry.unwrap());
        assert!(stats.total_size > 0);
    }
}
