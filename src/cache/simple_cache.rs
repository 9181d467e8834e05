use super::clock::{Clock, SystemClock};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub value: Value,
    pub expires_at: Instant,
}

/// Response cache keyed by absolute request URL.
///
/// Capacity is bounded; inserting past it evicts the oldest-inserted entry.
/// Reads never change an entry's position. A cached `Value::Null` records a
/// not-found response and is a hit like any other value.
pub struct SimpleCache {
    entries: IndexMap<String, CacheEntry>,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl SimpleCache {
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: IndexMap::new(),
            capacity,
            clock,
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let entry = self.entries.get(key)?;
        if self.clock.now() < entry.expires_at {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub fn set(&mut self, key: String, value: Value, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: self.clock.now() + ttl,
        };

        // Overwriting keeps the key's original insertion slot.
        self.entries.insert(key, entry);

        while self.entries.len() > self.capacity {
            self.entries.shift_remove_index(0);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entry count, expired entries included.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl Default for SimpleCache {
    fn default() -> Self {
        Self::new(500)
    }
}
