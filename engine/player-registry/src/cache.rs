//! Stats cache for raw adapter payloads
//!
//! Fetches are cached per (source key, season). Entries older than the TTL for their source
//! are treated as misses; live sources expire faster than historical ones.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Cache TTL configuration
#[derive(Debug, Clone)]
pub struct CachePolicy {
    /// TTL for live Tank01 payloads
    pub tank01_ttl: Duration,
    /// TTL for nflverse season files
    pub nflverse_ttl: Duration,
    /// TTL for any other source
    pub default_ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            tank01_ttl: Duration::from_secs(3600),    // 1 hour
            nflverse_ttl: Duration::from_secs(86400), // 1 day
            default_ttl: Duration::from_secs(86400),
        }
    }
}

impl CachePolicy {
    /// TTL for a source key, chosen by its prefix
    pub fn ttl_for(&self, key: &str) -> Duration {
        if key.starts_with("tank01") {
            self.tank01_ttl
        } else if key.starts_with("nflverse") {
            self.nflverse_ttl
        } else {
            self.default_ttl
        }
    }
}

/// A cache hit together with how long ago it was stored
#[derive(Debug, Clone, PartialEq)]
pub struct CachedEntry {
    pub data: Value,
    pub age: Duration,
}

#[async_trait]
pub trait StatsCache: Send + Sync {
    /// Fresh entry for (key, season), or None on a miss or an expired entry
    async fn read(&self, key: &str, season: i32) -> Option<CachedEntry>;

    async fn write(&self, key: &str, season: i32, data: Value);

    async fn clear(&self);

    /// Drop every entry whose key starts with `prefix`
    async fn clear_source(&self, prefix: &str);
}

#[derive(Debug)]
struct Entry {
    data: Value,
    stored_at: Instant,
}

/// In-process cache
#[derive(Debug, Default)]
pub struct MemoryStatsCache {
    entries: RwLock<HashMap<(String, i32), Entry>>,
    policy: CachePolicy,
}

impl MemoryStatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: CachePolicy) -> Self {
        Self { entries: RwLock::new(HashMap::new()), policy }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl StatsCache for MemoryStatsCache {
    async fn read(&self, key: &str, season: i32) -> Option<CachedEntry> {
        let entries = self.entries.read();
        let entry = match entries.get(&(key.to_string(), season)) {
            Some(entry) => entry,
            None => {
                debug!("Cache miss for {} {}", key, season);
                return None;
            }
        };

        let age = entry.stored_at.elapsed();
        if age >= self.policy.ttl_for(key) {
            debug!("Cache entry for {} {} expired after {}s", key, season, age.as_secs());
            return None;
        }

        debug!("Cache hit for {} {}", key, season);
        Some(CachedEntry { data: entry.data.clone(), age })
    }

    async fn write(&self, key: &str, season: i32, data: Value) {
        self.entries.write().insert((key.to_string(), season), Entry { data, stored_at: Instant::now() });
        debug!("Cached {} {}", key, season);
    }

    async fn clear(&self) {
        self.entries.write().clear();
    }

    async fn clear_source(&self, prefix: &str) {
        self.entries.write().retain(|(key, _), _| !key.starts_with(prefix));
        debug!("Cleared cache entries for {}", prefix);
    }
}
