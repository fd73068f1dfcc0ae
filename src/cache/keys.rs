//! Cache key construction.
//!
//! Memory keys are process-local and unprefixed. Distributed keys share a
//! configurable namespace so several deployments can point at one redis.
//! Both blob tiers key exclusively on the catalog sequence index; the
//! serialized listing has its own key, independent of any blob key.

/// Key for a raw blob in the memory tier: `id:<n>`.
pub fn memory_blob_key(id: usize) -> String {
    format!("id:{id}")
}

/// Key for an encoded blob in the distributed tier: `<prefix>:id:<n>`.
pub fn shared_blob_key(prefix: &str, id: usize) -> String {
    format!("{prefix}:id:{id}")
}

/// Key for the serialized catalog listing: `<prefix>:listing`.
pub fn listing_key(prefix: &str) -> String {
    format!("{prefix}:listing")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_keys_embed_the_sequence_index() {
        assert_eq!(memory_blob_key(0), "id:0");
        assert_eq!(memory_blob_key(42), "id:42");
        assert_eq!(shared_blob_key("jokes", 42), "jokes:id:42");
    }

    #[test]
    fn listing_key_is_disjoint_from_every_blob_key() {
        let listing = listing_key("jokes");
        assert_eq!(listing, "jokes:listing");
        for id in 0..100 {
            assert_ne!(listing, shared_blob_key("jokes", id));
        }
    }

    #[test]
    fn prefixes_keep_deployments_apart() {
        assert_ne!(shared_blob_key("jokes", 7), shared_blob_key("staging", 7));
    }
}
