use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// In-memory result cache keyed by the full query input. Entries older than
/// the TTL are dropped on read; nothing touches disk.
pub struct QueryCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        let mut guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let fresh = guard
            .get(key)
            .map(|entry| now.saturating_duration_since(entry.fetched_at) < self.ttl)?;
        if fresh {
            guard.get(key).map(|entry| entry.value.clone())
        } else {
            guard.remove(key);
            None
        }
    }

    pub fn insert_at(&self, key: K, value: V, now: Instant) {
        if self.ttl.is_zero() {
            return;
        }
        let mut guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        guard.retain(|_, entry| now.saturating_duration_since(entry.fetched_at) < self.ttl);
        guard.insert(
            key,
            CacheEntry {
                value,
                fetched_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}
