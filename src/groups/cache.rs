//! Time-to-live cache for reference groups.
//!
//! Entries are keyed by data source and store the fetched groups with the
//! instant they were fetched. Expiry is judged against an injected [`Clock`]
//! so tests can move time forward explicitly.

use crate::ir::DemographicGroup;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug, Clone)]
struct CachedGroups {
    value: Arc<Vec<DemographicGroup>>,
    fetched_at: Instant,
}

/// Cache statistics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub expirations: usize,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
struct CacheStorage {
    entries: HashMap<String, CachedGroups>,
    stats: CacheStats,
}

/// Per-data-source cache of reference groups.
///
/// Safe to share between threads; lookups take a write lock only to update
/// statistics and drop expired entries.
pub struct GroupCache {
    storage: RwLock<CacheStorage>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for GroupCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupCache")
            .field("ttl", &self.ttl)
            .field("len", &self.len())
            .finish()
    }
}

impl GroupCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage: RwLock::new(CacheStorage::default()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh groups for `key`, if any. Expired entries are evicted.
    pub fn get(&self, key: &str) -> Option<Arc<Vec<DemographicGroup>>> {
        let now = self.clock.now();
        let mut storage = self.storage.write().unwrap_or_else(|e| e.into_inner());

        let expired = storage
            .entries
            .get(key)
            .map(|entry| now.saturating_duration_since(entry.fetched_at) >= self.ttl);

        let fresh = match expired {
            Some(false) => storage.entries.get(key).map(|entry| Arc::clone(&entry.value)),
            Some(true) => {
                storage.entries.remove(key);
                storage.stats.expirations += 1;
                None
            }
            None => None,
        };

        if fresh.is_some() {
            storage.stats.hits += 1;
        } else {
            storage.stats.misses += 1;
        }
        fresh
    }

    pub fn insert(
        &self,
        key: impl Into<String>,
        groups: Vec<DemographicGroup>,
    ) -> Arc<Vec<DemographicGroup>> {
        let value = Arc::new(groups);
        let entry = CachedGroups {
            value: Arc::clone(&value),
            fetched_at: self.clock.now(),
        };
        self.storage
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .insert(key.into(), entry);
        value
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.storage
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .remove(key)
            .is_some()
    }

    pub fn clear(&self) {
        self.storage
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .clear();
    }

    pub fn len(&self) -> usize {
        self.storage
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.storage
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .stats
            .clone()
    }
}
