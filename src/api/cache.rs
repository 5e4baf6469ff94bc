/// In-memory TTL cache for successful API responses
///
/// Payloads are stored as raw JSON values under a canonical key derived
/// from the endpoint and query params, so identical logical requests hit
/// the same entry no matter how the caller ordered its params. Entries
/// are deleted lazily when found stale; staleness is strict
/// (`elapsed > ttl`), so a read at exactly the TTL boundary is fresh.
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// One cached payload with its validity window
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Value,
    pub stored_at: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn new(value: Value, ttl: Duration, stored_at: Instant) -> Self {
        Self {
            value,
            stored_at,
            ttl,
        }
    }

    /// Strictly-after staleness: exactly at the TTL boundary is fresh
    pub fn is_stale_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) > self.ttl
    }
}

/// Derive the canonical cache key for an endpoint + params pair
///
/// Null params are dropped, remaining keys are sorted, and the result is
/// serialized as a compact JSON object appended to the endpoint. With no
/// effective params the key is the endpoint alone.
pub fn cache_key(endpoint: &str, params: &[(String, Value)]) -> String {
    let sorted: BTreeMap<&str, &Value> = params
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.as_str(), value))
        .collect();

    if sorted.is_empty() {
        endpoint.to_string()
    } else {
        let serialized = serde_json::to_string(&sorted).unwrap_or_default();
        format!("{}{}", endpoint, serialized)
    }
}

/// Response cache statistics
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Thread-safe TTL response cache, owned by one client instance
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Store a payload under `key` for `ttl`
    ///
    /// Overwrites any existing entry for the same key (last write wins).
    pub fn insert(&self, key: String, value: Value, ttl: Duration) {
        let entry = CacheEntry::new(value, ttl, Instant::now());
        self.entries.write().insert(key, entry);
    }

    /// Get a fresh payload, deleting the entry when it turned stale
    ///
    /// Pure cache read; never triggers network access.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, Instant::now())
    }

    /// Staleness-checked read against a caller-supplied clock
    pub fn get_at(&self, key: &str, now: Instant) -> Option<Value> {
        let stale = {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if !entry.is_stale_at(now) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.value.clone());
                }
                Some(_) => true,
                None => false,
            }
        };

        if stale {
            self.entries.write().remove(key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Remove one entry by its exact key
    pub fn remove(&self, key: &str) {
        if self.entries.write().remove(key).is_some() {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Remove every entry whose key contains `fragment`
    ///
    /// Coarse invalidation used after mutations make cached reads of a
    /// resource stale.
    pub fn invalidate(&self, fragment: &str) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| !key.contains(fragment));
        let removed = before - entries.len();
        self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    /// Remove all entries (logout path)
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        let removed = entries.len();
        entries.clear();
        self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
    }

    /// Drop every entry that is already stale
    pub fn cleanup_expired(&self) {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_stale_at(now));
        self.evictions
            .fetch_add((before - entries.len()) as u64, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
