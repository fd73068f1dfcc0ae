//! Catalog listing resolution.
//!
//! The ordered descriptor list is cached in the distributed tier under
//! its own key; on a miss it is re-materialized by enumerating the
//! origin bucket. Enumeration failure invalidates the whole resolution;
//! partial listings are never returned.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tracing::{debug, warn};

use crate::domain::catalog::JokeDescriptor;
use crate::storage::OriginStore;

use super::encoding::{decode_payload, encode_payload};
use super::error::{LookupError, Stage};
use super::keys::listing_key;
use super::metrics::{METRIC_LISTING_HIT, METRIC_LISTING_MISS, METRIC_POPULATE_DROPPED};
use super::tiers::DistributedCache;

/// Resolves the descriptor list, distributed tier first.
pub struct CatalogService {
    shared: Arc<dyn DistributedCache>,
    origin: Arc<dyn OriginStore>,
    bucket: String,
    key: String,
    listing_ttl: Duration,
}

impl CatalogService {
    pub fn new(
        shared: Arc<dyn DistributedCache>,
        origin: Arc<dyn OriginStore>,
        bucket: impl Into<String>,
        key_prefix: &str,
        listing_ttl: Duration,
    ) -> Self {
        Self {
            shared,
            origin,
            bucket: bucket.into(),
            key: listing_key(key_prefix),
            listing_ttl,
        }
    }

    /// Resolve the ordered descriptor list.
    ///
    /// `sequence_index` is assigned by enumeration order and is stable
    /// only for the lifetime of one cached listing snapshot.
    pub async fn descriptors(&self) -> Result<Vec<JokeDescriptor>, LookupError> {
        let cached = self
            .shared
            .get(&self.key)
            .await
            .map_err(|err| LookupError::upstream(Stage::Distributed, err))?;

        if let Some(encoded) = cached {
            counter!(METRIC_LISTING_HIT).increment(1);
            let raw = decode_payload(Stage::Listing, &encoded)?;
            return serde_json::from_slice(&raw)
                .map_err(|err| LookupError::decode(Stage::Listing, err));
        }
        counter!(METRIC_LISTING_MISS).increment(1);

        let objects = self
            .origin
            .list(&self.bucket)
            .await
            .map_err(|err| LookupError::upstream(Stage::Origin, err))?;

        let descriptors: Vec<JokeDescriptor> = objects
            .into_iter()
            .enumerate()
            .map(|(sequence_index, object)| JokeDescriptor {
                sequence_index,
                object_name: object.name,
                content_type: object.content_type,
            })
            .collect();

        self.store_back(&descriptors).await;

        Ok(descriptors)
    }

    /// Best-effort store-back of the freshly enumerated listing. A write
    /// failure is observed but never fails the resolution that already
    /// succeeded against the origin.
    async fn store_back(&self, descriptors: &[JokeDescriptor]) {
        let raw = match serde_json::to_vec(descriptors) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "listing serialization failed");
                return;
            }
        };

        match self
            .shared
            .set(&self.key, encode_payload(&raw), self.listing_ttl)
            .await
        {
            Ok(()) => debug!(key = %self.key, count = descriptors.len(), "listing stored"),
            Err(err) => {
                counter!(METRIC_POPULATE_DROPPED).increment(1);
                warn!(error = %err, key = %self.key, "listing store-back failed");
            }
        }
    }
}
