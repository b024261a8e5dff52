//! LRU response cache with time-to-live expiry.
//!
//! Entries are keyed by a SHA-256 digest of `(prompt, model, context)` so the
//! same prompt asked under a different conversation history is a separate
//! entry. Recency is tracked by an unbounded `LruCache`; the size bound is
//! enforced here so that exactly one least-recently-used entry is evicted
//! after an insert that overflows it.
//!
//! Expiry is lazy: `lookup` and `stats` first sweep every entry whose age has
//! reached the TTL. The sweep is linear in the number of entries.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use lru::LruCache;
use parley_types::chat::CacheStats;
use sha2::{Digest, Sha256};
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    created_at: Instant,
    access_count: u64,
}

#[derive(Debug)]
struct CacheState {
    entries: LruCache<String, CacheEntry>,
    hits: u64,
    misses: u64,
}

/// Shared response cache. All operations take `&self` and serialize on an
/// internal mutex.
#[derive(Debug)]
pub struct ResponseCache {
    max_size: usize,
    ttl: Duration,
    state: Mutex<CacheState>,
}

/// Hex SHA-256 over the length-prefixed prompt, model, and context.
///
/// Length prefixes keep `("a|b", "c")` and `("a", "b|c")` apart.
pub fn cache_key(prompt: &str, model: &str, context: &str) -> String {
    let mut hasher = Sha256::new();
    for part in [prompt, model, context] {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

impl CacheState {
    fn purge_expired(&mut self, ttl: Duration) {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| now.saturating_duration_since(entry.created_at) >= ttl)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.pop(key);
        }
        if !expired.is_empty() {
            debug!(count = expired.len(), "expired cache entries removed");
        }
    }
}

impl ResponseCache {
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            max_size,
            ttl,
            state: Mutex::new(CacheState {
                entries: LruCache::unbounded(),
                hits: 0,
                misses: 0,
            }),
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached reply for this triple and mark it most recently used.
    pub fn lookup(&self, prompt: &str, model: &str, context: &str) -> Option<String> {
        let key = cache_key(prompt, model, context);
        let mut guard = self.lock();
        let state = &mut *guard;
        state.purge_expired(self.ttl);

        match state.entries.get_mut(&key) {
            Some(entry) => {
                entry.access_count += 1;
                let value = entry.value.clone();
                state.hits += 1;
                debug!(key = &key[..12], "response cache hit");
                Some(value)
            }
            None => {
                state.misses += 1;
                debug!(key = &key[..12], "response cache miss");
                None
            }
        }
    }

    /// Store a reply. An existing entry is overwritten and its TTL restarts.
    pub fn insert(&self, prompt: &str, model: &str, context: &str, value: impl Into<String>) {
        let key = cache_key(prompt, model, context);
        let value = value.into();
        let now = Instant::now();
        let mut guard = self.lock();
        let state = &mut *guard;

        if let Some(entry) = state.entries.get_mut(&key) {
            entry.value = value;
            entry.created_at = now;
            entry.access_count += 1;
            return;
        }

        state.entries.put(
            key,
            CacheEntry {
                value,
                created_at: now,
                access_count: 0,
            },
        );
        if state.entries.len() > self.max_size {
            if let Some((evicted, _)) = state.entries.pop_lru() {
                debug!(key = &evicted[..12], "response cache evicted least recently used entry");
            }
        }
    }

    /// Counters and size after sweeping expired entries.
    pub fn stats(&self) -> CacheStats {
        let mut state = self.lock();
        state.purge_expired(self.ttl);

        let total = state.hits + state.misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            let pct = state.hits as f64 / total as f64 * 100.0;
            (pct * 100.0).round() / 100.0
        };

        CacheStats {
            size: state.entries.len(),
            max_size: self.max_size,
            hits: state.hits,
            misses: state.misses,
            hit_rate,
            ttl_seconds: self.ttl.as_secs(),
        }
    }

    /// Drop every entry and reset the hit/miss counters.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.hits = 0;
        state.misses = 0;
    }

    /// Access count of an entry, without promoting it.
    pub fn access_count(&self, prompt: &str, model: &str, context: &str) -> Option<u64> {
        let key = cache_key(prompt, model, context);
        self.lock().entries.peek(&key).map(|entry| entry.access_count)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
