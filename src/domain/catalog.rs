//! Catalog records: descriptors enumerated from the origin store and the
//! byte payloads resolved from them.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Metadata identifying one joke image in the origin store.
///
/// `sequence_index` is a dense, zero-based position assigned by
/// enumeration order. It identifies a joke for the lifetime of one
/// listing snapshot; it is not a persistent database id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JokeDescriptor {
    pub sequence_index: usize,
    pub object_name: String,
    pub content_type: Option<String>,
}

/// Resolved image bytes plus optional content type.
///
/// Content type is metadata, not a delivery requirement: lookups served
/// from the memory or distributed tier return `None` because those tiers
/// store bytes only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JokeContent {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}
