//! Single-endpoint Redis store.
//!
//! Wraps the `redis` crate's async [`ConnectionManager`]: one multiplexed
//! connection per store, cheaply cloneable, reconnecting on its own schedule.
//! Database selection and authentication ride on the connection parameters,
//! so every (re)connection lands in the configured database already
//! authenticated.

use crate::cursor::ScanCursor;
use crate::error::StoreError;
use crate::store::{SCAN_BATCH_HINT, Store};
use async_trait::async_trait;
use canopy_config::{CacheConfig, Endpoint};
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use std::path::PathBuf;
use tracing::{debug, instrument};

/// A single Redis endpoint.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    endpoint: Endpoint,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl RedisStore {
    /// Connects to one endpoint using the database index, password, and
    /// connect timeout from `config`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Redis` if the client cannot be built or the
    /// initial connection fails.
    pub async fn connect(endpoint: &Endpoint, config: &CacheConfig) -> Result<Self, StoreError> {
        let addr = match endpoint {
            Endpoint::Tcp { host, port } => ConnectionAddr::Tcp(host.clone(), *port),
            Endpoint::Unix { path } => ConnectionAddr::Unix(PathBuf::from(path)),
        };

        let info = ConnectionInfo {
            addr,
            redis: RedisConnectionInfo {
                db: config.database,
                username: None,
                password: config.password.clone(),
                ..RedisConnectionInfo::default()
            },
        };

        let client = Client::open(info)?;
        let manager_config =
            ConnectionManagerConfig::new().set_connection_timeout(config.connect_timeout());
        let conn = ConnectionManager::new_with_config(client, manager_config).await?;

        debug!(store.endpoint = %endpoint, store.database = config.database, "Connected to Redis");

        Ok(Self {
            conn,
            endpoint: endpoint.clone(),
        })
    }

    /// One native SCAN step against this endpoint. Shared by the [`Store`]
    /// impl and by [`ShardedStore`](crate::ShardedStore), which drives the
    /// per-endpoint cursors itself.
    pub(crate) async fn scan_raw(
        &self,
        cursor: u64,
        pattern: &str,
    ) -> Result<(u64, Vec<String>), StoreError> {
        let mut conn = self.conn.clone();
        let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(SCAN_BATCH_HINT)
            .query_async(&mut conn)
            .await?;
        Ok((next_cursor, keys))
    }
}

#[async_trait]
impl Store for RedisStore {
    #[instrument(skip(self), fields(store.operation = "GET"))]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        debug!(store.key = %key, store.hit = value.is_some(), "Redis GET");
        Ok(value)
    }

    #[instrument(skip(self, value), fields(store.operation = "SET"))]
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    #[instrument(skip(self, value), fields(store.operation = "SETEX"))]
    async fn set_ex(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(store.operation = "DEL"))]
    async fn del(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(store.operation = "INCR"))]
    async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        let mut conn = self.conn.clone();
        let value: i64 = conn.incr(key, 1).await?;
        Ok(value)
    }

    #[instrument(skip(self), fields(store.operation = "SCAN"))]
    async fn scan(
        &self,
        cursor: ScanCursor,
        pattern: &str,
    ) -> Result<(ScanCursor, Vec<String>), StoreError> {
        let (next_cursor, keys) = self.scan_raw(cursor.cursor(), pattern).await?;
        let next = if next_cursor == 0 {
            ScanCursor::finished()
        } else {
            ScanCursor::resume(0, next_cursor)
        };
        Ok((next, keys))
    }

    #[instrument(skip(self), fields(store.operation = "FLUSHDB"))]
    async fn flush_db(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await?;
        debug!(store.endpoint = %self.endpoint, "Flushed database");
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        true
    }
}
