//! Redis-backed distributed tier.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::cache::{DistributedCache, TierError};
use crate::config::RedisSettings;

use super::error::InfraError;

/// Shared text cache over one multiplexed redis connection.
///
/// `ConnectionManager` reconnects internally and is cheap to clone, so
/// one adapter serves unbounded concurrent callers without external
/// locking; single-key reads and writes rely on redis's own atomicity.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    /// Open a managed connection from settings.
    pub async fn connect(settings: &RedisSettings) -> Result<Self, InfraError> {
        let client = redis::Client::open(settings.url.as_str())
            .map_err(|err| InfraError::configuration(format!("invalid redis url: {err}")))?;
        let connection = ConnectionManager::new(client)
            .await
            .map_err(|err| InfraError::cache(format!("redis connection failed: {err}")))?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl DistributedCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, TierError> {
        let mut connection = self.connection.clone();
        connection
            .get::<_, Option<String>>(key)
            .await
            .map_err(TierError::transport)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), TierError> {
        let mut connection = self.connection.clone();
        // A zero TTL would be an error at the server; clamp to the
        // smallest bounded retention instead.
        let ttl_secs = ttl.as_secs().max(1);
        connection
            .set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(TierError::transport)
    }
}
