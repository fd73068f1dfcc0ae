//! Jokebox Cache System
//!
//! Provides three-tier read-through caching for joke image lookups:
//!
//! - **Memory tier**: process-local LRU of raw bytes, volatile, unshared
//! - **Distributed tier**: shared text store (redis) of hex-encoded
//!   bytes, TTL-bounded
//! - **Origin**: the authoritative object store, consulted last
//!
//! A lookup walks the tiers fastest to slowest, short-circuits on the
//! first hit, and repairs the faster tiers it already passed with
//! best-effort background writes.
//!
//! ## Configuration
//!
//! Cache behavior is controlled via `jokebox.toml`:
//!
//! ```toml
//! [cache]
//! key_prefix = "jokes"
//! memory_entry_limit = 512
//! blob_ttl_seconds = 3600
//! # ... see config.rs for all options
//! ```

mod config;
mod encoding;
mod error;
mod keys;
mod listing;
mod memory;
pub(crate) mod metrics;
mod pipeline;
mod tiers;

pub use config::CacheConfig;
pub use encoding::{decode_payload, encode_payload};
pub use error::{LookupError, Stage, TierError};
pub use keys::{listing_key, memory_blob_key, shared_blob_key};
pub use listing::CatalogService;
pub use memory::LruMemoryCache;
pub use pipeline::JokePipeline;
pub use tiers::{DistributedCache, MemoryCache};
