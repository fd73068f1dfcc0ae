//! Tiered lookup pipeline.
//!
//! Resolves "joke #i" and "a random joke" into bytes plus optional
//! content type by walking the tiers strictly fastest to slowest and
//! short-circuiting on the first hit. A hit at a slower tier repairs the
//! faster tiers already passed with fire-and-forget background writes;
//! a population failure is logged and counted, never surfaced to the
//! caller whose authoritative read already succeeded.
//!
//! Concurrent first-fetches of the same uncached id may each reach the
//! origin and write back; last write wins at each tier. That race is
//! accepted; there is no single-flight de-duplication here.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use metrics::{counter, histogram};
use rand::Rng;
use tracing::{debug, warn};

use crate::domain::catalog::{JokeContent, JokeDescriptor};
use crate::storage::{self, OriginStore};

use super::config::CacheConfig;
use super::encoding::{decode_payload, encode_payload};
use super::error::{LookupError, Stage};
use super::keys::{memory_blob_key, shared_blob_key};
use super::listing::CatalogService;
use super::metrics::{
    METRIC_DISTRIBUTED_HIT, METRIC_DISTRIBUTED_MISS, METRIC_LOOKUP_MS, METRIC_MEMORY_HIT,
    METRIC_MEMORY_MISS, METRIC_ORIGIN_FETCH, METRIC_POPULATE_DROPPED,
};
use super::tiers::{DistributedCache, MemoryCache};

/// Three-tier read-through pipeline over memory, distributed cache, and
/// the origin object store.
///
/// All backing handles are injected at construction and shared via
/// `Arc`; the pipeline holds no cross-request mutable state and is safe
/// for unbounded concurrent callers.
pub struct JokePipeline {
    memory: Arc<dyn MemoryCache>,
    shared: Arc<dyn DistributedCache>,
    origin: Arc<dyn OriginStore>,
    catalog: CatalogService,
    bucket: String,
    key_prefix: String,
    blob_ttl: Duration,
    op_timeout: Duration,
    populate_timeout: Duration,
}

impl JokePipeline {
    pub fn new(
        memory: Arc<dyn MemoryCache>,
        shared: Arc<dyn DistributedCache>,
        origin: Arc<dyn OriginStore>,
        bucket: impl Into<String>,
        config: &CacheConfig,
    ) -> Self {
        let bucket = bucket.into();
        let catalog = CatalogService::new(
            Arc::clone(&shared),
            Arc::clone(&origin),
            bucket.clone(),
            &config.key_prefix,
            config.listing_ttl(),
        );
        Self {
            memory,
            shared,
            origin,
            catalog,
            bucket,
            key_prefix: config.key_prefix.clone(),
            blob_ttl: config.blob_ttl(),
            op_timeout: config.op_timeout(),
            populate_timeout: config.populate_timeout(),
        }
    }

    /// Number of jokes in the current listing snapshot.
    pub async fn total_count(&self) -> Result<usize, LookupError> {
        let descriptors = self
            .timed(Stage::Listing, self.catalog.descriptors())
            .await?;
        Ok(descriptors.len())
    }

    /// Resolve one joke by catalog index, fastest tier first.
    pub async fn get_by_id(&self, id: usize) -> Result<JokeContent, LookupError> {
        let started_at = Instant::now();
        let result = self.lookup_by_id(id).await;
        histogram!(METRIC_LOOKUP_MS).record(started_at.elapsed().as_secs_f64() * 1000.0);
        result
    }

    /// Resolve a uniformly random joke.
    ///
    /// Fails with [`LookupError::Empty`] when the catalog has no entries;
    /// otherwise every index in `[0, count - 1]` is reachable, both
    /// endpoints included.
    pub async fn get_random(&self) -> Result<JokeContent, LookupError> {
        let total = self.total_count().await?;
        if total == 0 {
            return Err(LookupError::Empty);
        }
        self.get_by_id(draw_index(total)).await
    }

    async fn lookup_by_id(&self, id: usize) -> Result<JokeContent, LookupError> {
        let memory_key = memory_blob_key(id);
        if let Some(bytes) = self
            .memory
            .get(&memory_key)
            .map_err(|err| LookupError::upstream(Stage::Memory, err))?
        {
            counter!(METRIC_MEMORY_HIT).increment(1);
            // Content type is not preserved at this tier; bytes alone are
            // a complete response.
            return Ok(JokeContent {
                bytes,
                content_type: None,
            });
        }
        counter!(METRIC_MEMORY_MISS).increment(1);

        let shared_key = shared_blob_key(&self.key_prefix, id);
        let cached = self
            .timed(Stage::Distributed, async {
                self.shared
                    .get(&shared_key)
                    .await
                    .map_err(|err| LookupError::upstream(Stage::Distributed, err))
            })
            .await?;
        if let Some(encoded) = cached {
            counter!(METRIC_DISTRIBUTED_HIT).increment(1);
            let bytes = decode_payload(Stage::Distributed, &encoded)?;
            self.spawn_memory_populate(memory_key, bytes.clone());
            return Ok(JokeContent {
                bytes,
                content_type: None,
            });
        }
        counter!(METRIC_DISTRIBUTED_MISS).increment(1);

        let descriptors = self
            .timed(Stage::Listing, self.catalog.descriptors())
            .await?;
        let total = descriptors.len();
        let Some(descriptor) = descriptors.into_iter().nth(id) else {
            return Err(LookupError::NotFound { id, total });
        };

        let bytes = self
            .timed(Stage::Origin, self.fetch_origin(&descriptor))
            .await?;
        counter!(METRIC_ORIGIN_FETCH).increment(1);
        self.spawn_shared_populate(shared_key, bytes.clone());

        Ok(JokeContent {
            bytes,
            content_type: descriptor.content_type,
        })
    }

    /// Fetch one object from the origin, draining its stream fully. The
    /// stream is dropped (and the connection released) on every exit
    /// path, error paths included.
    async fn fetch_origin(&self, descriptor: &JokeDescriptor) -> Result<Bytes, LookupError> {
        let stream = self
            .origin
            .fetch(&self.bucket, &descriptor.object_name)
            .await
            .map_err(|err| LookupError::upstream(Stage::Origin, err))?;
        storage::read_object(stream)
            .await
            .map_err(|err| LookupError::upstream(Stage::Origin, err))
    }

    /// Repair the memory tier after a distributed hit. The task owns
    /// copies of everything it touches and reports failure without
    /// affecting the request that spawned it.
    fn spawn_memory_populate(&self, key: String, bytes: Bytes) {
        let memory = Arc::clone(&self.memory);
        tokio::spawn(async move {
            if let Err(err) = memory.set(&key, bytes) {
                counter!(METRIC_POPULATE_DROPPED).increment(1);
                warn!(error = %err, key = %key, "memory populate failed");
            }
        });
    }

    /// Repair the distributed tier after an origin fetch, under its own
    /// budget so a stalled write cannot leak the task.
    fn spawn_shared_populate(&self, key: String, bytes: Bytes) {
        let shared = Arc::clone(&self.shared);
        let ttl = self.blob_ttl;
        let budget = self.populate_timeout;
        tokio::spawn(async move {
            let encoded = encode_payload(&bytes);
            match tokio::time::timeout(budget, shared.set(&key, encoded, ttl)).await {
                Ok(Ok(())) => debug!(key = %key, "distributed populate stored"),
                Ok(Err(err)) => {
                    counter!(METRIC_POPULATE_DROPPED).increment(1);
                    warn!(error = %err, key = %key, "distributed populate failed");
                }
                Err(_) => {
                    counter!(METRIC_POPULATE_DROPPED).increment(1);
                    warn!(key = %key, "distributed populate timed out");
                }
            }
        });
    }

    async fn timed<T, F>(&self, stage: Stage, operation: F) -> Result<T, LookupError>
    where
        F: Future<Output = Result<T, LookupError>>,
    {
        match tokio::time::timeout(self.op_timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout { stage }),
        }
    }
}

/// Uniform draw over `0..total`. The half-open range keeps both catalog
/// endpoints reachable.
fn draw_index(total: usize) -> usize {
    rand::thread_rng().gen_range(0..total)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::draw_index;

    #[test]
    fn draw_is_constant_for_a_single_entry() {
        for _ in 0..100 {
            assert_eq!(draw_index(1), 0);
        }
    }

    #[test]
    fn draw_reaches_both_endpoints() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let index = draw_index(5);
            assert!(index < 5);
            seen.insert(index);
        }
        assert!(seen.contains(&0), "low endpoint never drawn");
        assert!(seen.contains(&4), "high endpoint never drawn");
        assert_eq!(seen.len(), 5);
    }
}
