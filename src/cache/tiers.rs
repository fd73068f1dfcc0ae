//! Tier seams consumed by the lookup pipeline.
//!
//! Each tier exposes a uniform value/hit/error contract: an absent entry
//! is `Ok(None)`, never an error. The pipeline owns tier ordering and
//! repair; implementations own their storage, eviction, and atomicity.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use super::error::TierError;

/// Process-local byte cache, the fastest tier.
///
/// No TTL contract: retention is an internal policy of the
/// implementation. The error arm exists for implementations backed by
/// fallible storage; the in-process LRU never uses it.
pub trait MemoryCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Bytes>, TierError>;
    fn set(&self, key: &str, value: Bytes) -> Result<(), TierError>;
}

/// Shared text cache, the middle tier.
///
/// Values are transport-encoded text (see [`super::encoding`]); a TTL is
/// mandatory on every write because this tier is a cache, not a store of
/// record. Implementations must tolerate concurrent readers and writers
/// relying only on single-key atomicity.
#[async_trait]
pub trait DistributedCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, TierError>;
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), TierError>;
}
