//! Construction-time selection between the Redis store variants.

use crate::cursor::ScanCursor;
use crate::error::StoreError;
use crate::redis::RedisStore;
use crate::sharded::ShardedStore;
use crate::store::Store;
use async_trait::async_trait;
use canopy_config::CacheConfig;

/// The Redis store variant actually connected: a direct single-endpoint
/// connection, or the key-routing sharded set.
///
/// Chosen once, from the configured endpoint count, by
/// [`RedisBackend::connect`]; everything above this type depends only on the
/// [`Store`] trait and never learns which variant it got.
#[derive(Debug, Clone)]
pub enum RedisBackend {
    /// One endpoint.
    Single(RedisStore),
    /// Two or more endpoints with hash-routed keys.
    Sharded(ShardedStore),
}

impl RedisBackend {
    /// Connects the variant matching `config`: one configured endpoint yields
    /// [`RedisBackend::Single`], several yield [`RedisBackend::Sharded`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` for an empty endpoint list and
    /// `StoreError::Redis` for connection failures.
    pub async fn connect(config: &CacheConfig) -> Result<Self, StoreError> {
        config.validate()?;

        if let [endpoint] = config.servers.as_slice() {
            Ok(Self::Single(RedisStore::connect(endpoint, config).await?))
        } else {
            Ok(Self::Sharded(ShardedStore::connect(config).await?))
        }
    }
}

#[async_trait]
impl Store for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match self {
            Self::Single(store) => store.get(key).await,
            Self::Sharded(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        match self {
            Self::Single(store) => store.set(key, value).await,
            Self::Sharded(store) => store.set(key, value).await,
        }
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<(), StoreError> {
        match self {
            Self::Single(store) => store.set_ex(key, value, ttl_seconds).await,
            Self::Sharded(store) => store.set_ex(key, value, ttl_seconds).await,
        }
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        match self {
            Self::Single(store) => store.del(key).await,
            Self::Sharded(store) => store.del(key).await,
        }
    }

    async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        match self {
            Self::Single(store) => store.incr(key).await,
            Self::Sharded(store) => store.incr(key).await,
        }
    }

    async fn scan(
        &self,
        cursor: ScanCursor,
        pattern: &str,
    ) -> Result<(ScanCursor, Vec<String>), StoreError> {
        match self {
            Self::Single(store) => store.scan(cursor, pattern).await,
            Self::Sharded(store) => store.scan(cursor, pattern).await,
        }
    }

    async fn flush_db(&self) -> Result<(), StoreError> {
        match self {
            Self::Single(store) => store.flush_db().await,
            Self::Sharded(store) => store.flush_db().await,
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Self::Single(store) => store.ping().await,
            Self::Sharded(store) => store.ping().await,
        }
    }

    fn is_persistent(&self) -> bool {
        match self {
            Self::Single(store) => store.is_persistent(),
            Self::Sharded(store) => store.is_persistent(),
        }
    }
}
