//! Cache configuration.
//!
//! Controls tier sizing, retention, and timing budgets via the `[cache]`
//! section of `jokebox.toml`.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Deserialize;

// Default values for cache configuration
const DEFAULT_KEY_PREFIX: &str = "jokes";
const DEFAULT_MEMORY_ENTRY_LIMIT: usize = 512;
const DEFAULT_BLOB_TTL_SECONDS: u64 = 3600;
const DEFAULT_LISTING_TTL_SECONDS: u64 = 3600;
const DEFAULT_OP_TIMEOUT_MS: u64 = 5000;
const DEFAULT_POPULATE_TIMEOUT_MS: u64 = 60_000;

/// Cache configuration from `jokebox.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Namespace prefix for distributed-tier keys.
    pub key_prefix: String,
    /// Maximum entries held by the memory tier.
    pub memory_entry_limit: usize,
    /// Retention for encoded blobs in the distributed tier.
    pub blob_ttl_seconds: u64,
    /// Retention for the serialized listing in the distributed tier.
    pub listing_ttl_seconds: u64,
    /// Budget for one tier or origin operation.
    pub op_timeout_ms: u64,
    /// Budget for one background population write.
    pub populate_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            memory_entry_limit: DEFAULT_MEMORY_ENTRY_LIMIT,
            blob_ttl_seconds: DEFAULT_BLOB_TTL_SECONDS,
            listing_ttl_seconds: DEFAULT_LISTING_TTL_SECONDS,
            op_timeout_ms: DEFAULT_OP_TIMEOUT_MS,
            populate_timeout_ms: DEFAULT_POPULATE_TIMEOUT_MS,
        }
    }
}

impl CacheConfig {
    /// Returns the memory entry limit as NonZeroUsize, clamping to 1 if zero.
    pub fn memory_entry_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.memory_entry_limit).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn blob_ttl(&self) -> Duration {
        Duration::from_secs(self.blob_ttl_seconds)
    }

    pub fn listing_ttl(&self) -> Duration {
        Duration::from_secs(self.listing_ttl_seconds)
    }

    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms)
    }

    pub fn populate_timeout(&self) -> Duration {
        Duration::from_millis(self.populate_timeout_ms)
    }
}
