//! Metric names recorded by the cache pipeline.
//!
//! Descriptions live in `infra::telemetry`.

pub(crate) const METRIC_MEMORY_HIT: &str = "jokebox_cache_memory_hit_total";
pub(crate) const METRIC_MEMORY_MISS: &str = "jokebox_cache_memory_miss_total";
pub(crate) const METRIC_DISTRIBUTED_HIT: &str = "jokebox_cache_distributed_hit_total";
pub(crate) const METRIC_DISTRIBUTED_MISS: &str = "jokebox_cache_distributed_miss_total";
pub(crate) const METRIC_LISTING_HIT: &str = "jokebox_cache_listing_hit_total";
pub(crate) const METRIC_LISTING_MISS: &str = "jokebox_cache_listing_miss_total";
pub(crate) const METRIC_ORIGIN_FETCH: &str = "jokebox_origin_fetch_total";
pub(crate) const METRIC_POPULATE_DROPPED: &str = "jokebox_cache_populate_dropped_total";
pub(crate) const METRIC_LOOKUP_MS: &str = "jokebox_lookup_ms";
