//! Origin object-store boundary.
//!
//! The origin is authoritative and append-only: it owns the ground-truth
//! listing of joke objects and their byte content. The cache pipeline
//! only ever enumerates one fixed logical bucket and fetches objects by
//! name; everything else (retention, layout, replication) belongs to the
//! store.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use futures::stream::BoxStream;
use thiserror::Error;

pub mod fs;

/// Errors surfaced by an origin store implementation.
#[derive(Debug, Error)]
pub enum OriginError {
    #[error("enumerating bucket `{bucket}`: {message}")]
    List { bucket: String, message: String },
    #[error("fetching object `{name}`: {message}")]
    Fetch { name: String, message: String },
}

impl OriginError {
    pub fn list(bucket: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::List {
            bucket: bucket.into(),
            message: message.to_string(),
        }
    }

    pub fn fetch(name: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Fetch {
            name: name.into(),
            message: message.to_string(),
        }
    }
}

/// One enumerated object: opaque storage key plus metadata.
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    pub name: String,
    pub size: u64,
    pub content_type: Option<String>,
}

/// Fallible byte stream produced by [`OriginStore::fetch`].
///
/// Dropping the stream releases the underlying resource, so every exit
/// path of a consumer closes the connection deterministically.
pub type ObjectStream = BoxStream<'static, Result<Bytes, OriginError>>;

/// Authoritative, append-only store of joke objects.
#[async_trait]
pub trait OriginStore: Send + Sync {
    /// Enumerate the bucket in stable order.
    async fn list(&self, bucket: &str) -> Result<Vec<ObjectEntry>, OriginError>;

    /// Open the named object for reading.
    async fn fetch(&self, bucket: &str, name: &str) -> Result<ObjectStream, OriginError>;
}

/// Drain an object stream fully into memory.
///
/// A mid-stream failure abandons the partial read; the early return
/// drops the stream and with it the underlying handle.
pub async fn read_object(mut stream: ObjectStream) -> Result<Bytes, OriginError> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    Ok(buffer.freeze())
}
