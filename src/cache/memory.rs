//! Process-local memory tier.

use std::num::NonZeroUsize;
use std::sync::{RwLock, RwLockWriteGuard};

use bytes::Bytes;
use lru::LruCache;
use tracing::warn;

use super::error::TierError;
use super::tiers::MemoryCache;

/// LRU-bounded in-process blob cache.
///
/// Volatile by design: entries live until capacity eviction or process
/// restart, and are never shared across instances. Lookups take the
/// write lock because an LRU read promotes the entry.
pub struct LruMemoryCache {
    entries: RwLock<LruCache<String, Bytes>>,
}

impl LruMemoryCache {
    pub fn new(entry_limit: NonZeroUsize) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(entry_limit)),
        }
    }

    fn entries(&self, op: &'static str) -> RwLockWriteGuard<'_, LruCache<String, Bytes>> {
        match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(
                    op,
                    lock_kind = "rwlock.write",
                    result = "poisoned_recovered",
                    "Recovered from poisoned memory-tier lock"
                );
                poisoned.into_inner()
            }
        }
    }
}

impl MemoryCache for LruMemoryCache {
    fn get(&self, key: &str) -> Result<Option<Bytes>, TierError> {
        Ok(self.entries("get").get(key).cloned())
    }

    fn set(&self, key: &str, value: Bytes) -> Result<(), TierError> {
        self.entries("set").put(key.to_string(), value);
        Ok(())
    }
}
