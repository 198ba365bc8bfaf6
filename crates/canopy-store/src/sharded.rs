//! Multi-endpoint Redis store with stable per-key routing.
//!
//! Every key is owned by exactly one endpoint, chosen by a content hash that
//! is stable across processes and restarts. Any two driver instances
//! configured with the same endpoint list therefore route a given key (and
//! its generation-index counterpart) to the same server, which is what keeps
//! the store-side INCR a real synchronization point under sharding.
//!
//! Keyspace-wide operations (`scan`, `flush_db`, `ping`) cover every endpoint.

use crate::cursor::ScanCursor;
use crate::error::StoreError;
use crate::redis::RedisStore;
use crate::store::Store;
use async_trait::async_trait;
use canopy_config::CacheConfig;
use sha2::{Digest, Sha256};
use tracing::debug;

/// A set of Redis endpoints with hash-routed keys.
#[derive(Debug, Clone)]
pub struct ShardedStore {
    shards: Vec<RedisStore>,
}

impl ShardedStore {
    /// Connects to every configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if the endpoint list is empty, or
    /// `StoreError::Redis` if any endpoint fails to connect. Partial
    /// connection is not useful here: with a shard unreachable, a slice of
    /// the keyspace has no owner.
    pub async fn connect(config: &CacheConfig) -> Result<Self, StoreError> {
        config.validate()?;

        let mut shards = Vec::with_capacity(config.servers.len());
        for endpoint in &config.servers {
            shards.push(RedisStore::connect(endpoint, config).await?);
        }

        debug!(store.shards = shards.len(), "Connected sharded store");

        Ok(Self { shards })
    }

    /// Number of endpoints.
    #[must_use]
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Index of the endpoint owning `key`.
    #[must_use]
    pub fn shard_index(&self, key: &str) -> usize {
        (route_hash(key) % self.shards.len() as u64) as usize
    }

    fn shard_for(&self, key: &str) -> &RedisStore {
        &self.shards[self.shard_index(key)]
    }
}

/// Stable routing hash for a key.
///
/// SHA-256 keeps the routing identical across processes; the std hasher is
/// randomized per process and would scatter a key over different shards from
/// different workers.
fn route_hash(key: &str) -> u64 {
    let digest = Sha256::digest(key.as_bytes());
    u64::from_be_bytes(digest[..8].try_into().expect("SHA-256 digest is 32 bytes"))
}

#[async_trait]
impl Store for ShardedStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.shard_for(key).get(key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.shard_for(key).set(key, value).await
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<(), StoreError> {
        self.shard_for(key).set_ex(key, value, ttl_seconds).await
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        self.shard_for(key).del(key).await
    }

    async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        self.shard_for(key).incr(key).await
    }

    /// Scans endpoints one at a time, in configuration order. The returned
    /// cursor carries both the endpoint index and that endpoint's native
    /// cursor; exhaustion means the last endpoint's scan has wrapped.
    async fn scan(
        &self,
        cursor: ScanCursor,
        pattern: &str,
    ) -> Result<(ScanCursor, Vec<String>), StoreError> {
        let shard = cursor.shard();
        if shard >= self.shards.len() {
            return Ok((ScanCursor::finished(), Vec::new()));
        }

        let (next_cursor, keys) = self.shards[shard].scan_raw(cursor.cursor(), pattern).await?;

        let next = if next_cursor != 0 {
            ScanCursor::resume(shard, next_cursor)
        } else if shard + 1 < self.shards.len() {
            ScanCursor::resume(shard + 1, 0)
        } else {
            ScanCursor::finished()
        };

        Ok((next, keys))
    }

    async fn flush_db(&self) -> Result<(), StoreError> {
        for shard in &self.shards {
            shard.flush_db().await?;
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        for shard in &self.shards {
            shard.ping().await?;
        }
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_hash_is_deterministic() {
        assert_eq!(route_hash("cache:users:42"), route_hash("cache:users:42"));
    }

    #[test]
    fn test_route_hash_differs_across_keys() {
        assert_ne!(route_hash("cache:users:42"), route_hash("cache:users:43"));
    }

    #[test]
    fn test_route_hash_spreads_over_shards() {
        // 100 sequential keys should not all land on one of four shards.
        let mut hits = [0usize; 4];
        for i in 0..100 {
            let key = format!("cache:item:{i}");
            hits[(route_hash(&key) % 4) as usize] += 1;
        }
        assert!(hits.iter().all(|&count| count > 0), "hits: {hits:?}");
    }
}
