//! TTL response cache.
//!
//! Entries expire lazily on read. After every insert a sweep drops expired
//! entries and, while the map is still over capacity, evicts whatever expires
//! soonest. One mutex guards the whole map, so a read-check-write or a sweep
//! never interleaves with another request.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;
use vedaguru_core::ProviderFamily;

/// `(provider, category, topic, sha256(message))`.
///
/// Replies differ per provider (Perplexity appends its sources), so the
/// family is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub provider: ProviderFamily,
    pub category: String,
    pub topic: String,
    pub message_hash: String,
}

impl CacheKey {
    pub fn new(provider: ProviderFamily, category: &str, topic: &str, message: &str) -> Self {
        Self {
            provider,
            category: category.to_string(),
            topic: topic.to_string(),
            message_hash: hex::encode(Sha256::digest(message.as_bytes())),
        }
    }
}

/// Longest lifetime an entry can get, roughly one century.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

struct CachedResponse {
    value: String,
    expires_at: Instant,
}

/// Snapshot of cache occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_entries: usize,
    pub utilization_percent: f64,
}

pub struct ResponseCache {
    entries: Mutex<HashMap<CacheKey, CachedResponse>>,
    max_entries: usize,
    default_ttl: Duration,
}

impl ResponseCache {
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries,
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn get(&self, key: &CacheKey) -> Option<String> {
        self.get_at(key, Instant::now())
    }

    /// Look up `key` as of `now`. An expired entry is removed and reported as a miss.
    pub fn get_at(&self, key: &CacheKey, now: Instant) -> Option<String> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                debug!(category = %key.category, topic = %key.topic, "Cache entry expired");
                None
            }
            None => None,
        }
    }

    /// Insert with the default TTL.
    pub fn put(&self, key: CacheKey, value: impl Into<String>) {
        self.put_with_ttl(key, value, self.default_ttl);
    }

    pub fn put_with_ttl(&self, key: CacheKey, value: impl Into<String>, ttl: Duration) {
        self.put_at(key, value, ttl, Instant::now());
    }

    /// A TTL too large to represent is clamped to [`MAX_TTL`].
    pub fn put_at(&self, key: CacheKey, value: impl Into<String>, ttl: Duration, now: Instant) {
        let expires_at = now
            .checked_add(ttl.min(MAX_TTL))
            .or_else(|| now.checked_add(MAX_TTL))
            .unwrap_or(now);
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key,
            CachedResponse {
                value: value.into(),
                expires_at,
            },
        );
        Self::sweep_locked(&mut entries, self.max_entries, now);
    }

    /// Drop expired entries, then trim to capacity. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock().unwrap();
        Self::sweep_locked(&mut entries, self.max_entries, now)
    }

    fn sweep_locked(entries: &mut HashMap<CacheKey, CachedResponse>, max_entries: usize, now: Instant) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        let expired = before - entries.len();

        let mut evicted = 0;
        if entries.len() > max_entries {
            let mut by_expiry: Vec<(Instant, CacheKey)> = entries
                .iter()
                .map(|(key, entry)| (entry.expires_at, key.clone()))
                .collect();
            by_expiry.sort_by_key(|(expires_at, _)| *expires_at);

            let overflow = entries.len() - max_entries;
            for (_, key) in by_expiry.into_iter().take(overflow) {
                entries.remove(&key);
                evicted += 1;
            }
        }

        if expired + evicted > 0 {
            debug!(expired, evicted, remaining = entries.len(), "Cache swept");
        }
        expired + evicted
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let size = self.len();
        let utilization_percent = if self.max_entries == 0 {
            0.0
        } else {
            (size as f64 / self.max_entries as f64 * 10000.0).round() / 100.0
        };
        CacheStats {
            size,
            max_entries: self.max_entries,
            utilization_percent,
        }
    }
}
