//! jokebox library crate.
//!
//! The core of jokebox is [`cache::JokePipeline`], a three-tier
//! read-through cache that resolves "joke #i" and "a random joke" into
//! image bytes: a process-local memory tier, a shared distributed tier,
//! and the authoritative origin object store, consulted strictly fastest
//! to slowest with best-effort repair of the faster tiers on the way
//! back. Everything else here is plumbing around that pipeline:
//! configuration, telemetry, and the tier adapters.

pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod storage;
