//! Time-bounded memoization of feed results.
//!
//! `TtlCache` is a plain key -> (value, expiry) store owned by the caller and
//! passed in explicitly, so normalizers stay free of global state. Expiry is
//! measured on the monotonic clock; `get_or_populate_at` takes the instant as
//! a parameter for deterministic tests.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, Entry<V>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value for `key` if it has not expired at `now`,
    /// otherwise calls `populate`, stores the result, and returns it.
    ///
    /// An entry is fresh while `now < inserted_at + ttl`. A zero TTL disables
    /// caching.
    pub fn get_or_populate_at(&mut self, key: K, now: Instant, populate: impl FnOnce() -> V) -> V {
        if let Some(entry) = self.entries.get(&key) {
            if now < entry.expires_at {
                return entry.value.clone();
            }
        }

        let value = populate();
        self.entries.insert(
            key,
            Entry {
                value: value.clone(),
                expires_at: now + self.ttl,
            },
        );
        value
    }

    pub fn get_or_populate(&mut self, key: K, populate: impl FnOnce() -> V) -> V {
        self.get_or_populate_at(key, Instant::now(), populate)
    }

    /// Drops entries that have expired at `now`.
    pub fn purge_expired(&mut self, now: Instant) {
        self.entries.retain(|_, entry| now < entry.expires_at);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
