//! The store capability trait.

use crate::cursor::ScanCursor;
use crate::error::StoreError;
use async_trait::async_trait;
use std::sync::Arc;

/// Batch-size hint passed to the store's scan command (`COUNT`). A hint only:
/// stores may return fewer keys, more keys, or none at all per batch.
pub const SCAN_BATCH_HINT: usize = 100;

/// Flat key-value store operations the cache driver is built on.
///
/// The driver issues these serially, one command awaited to completion before
/// the next, and relies on exactly two store-native guarantees: [`incr`] is
/// atomic across clients, and a [`scan`] driven to cursor exhaustion visits
/// every key that existed for the duration of the iteration.
///
/// [`incr`]: Store::incr
/// [`scan`]: Store::scan
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetches the raw bytes stored at `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stores `value` at `key` with no expiry.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Stores `value` at `key`, expiring after `ttl_seconds`.
    ///
    /// Callers must pass a positive TTL; Redis rejects zero and negative
    /// values at the protocol level.
    async fn set_ex(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<(), StoreError>;

    /// Deletes `key`. Deleting an absent key is not an error.
    async fn del(&self, key: &str) -> Result<(), StoreError>;

    /// Atomically increments the integer at `key` and returns the new value,
    /// creating the entry at 1 if absent.
    async fn incr(&self, key: &str) -> Result<i64, StoreError>;

    /// Advances a cursor-based iteration over keys matching the glob
    /// `pattern`, returning the next cursor and a batch of matches.
    ///
    /// Iteration starts from [`ScanCursor::start`] and is complete only when
    /// the returned cursor reports [`ScanCursor::is_exhausted`]; empty
    /// batches before that are normal.
    async fn scan(
        &self,
        cursor: ScanCursor,
        pattern: &str,
    ) -> Result<(ScanCursor, Vec<String>), StoreError>;

    /// Removes every key in the selected database (all endpoints for sharded
    /// stores).
    async fn flush_db(&self) -> Result<(), StoreError>;

    /// Round-trips a ping to every endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Whether data stored here survives this process.
    fn is_persistent(&self) -> bool;
}

/// Shared handles delegate. Lets several driver instances (e.g. separate
/// workers in a test) sit on one store.
#[async_trait]
impl<S: Store + ?Sized> Store for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<(), StoreError> {
        (**self).set_ex(key, value, ttl_seconds).await
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        (**self).del(key).await
    }

    async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        (**self).incr(key).await
    }

    async fn scan(
        &self,
        cursor: ScanCursor,
        pattern: &str,
    ) -> Result<(ScanCursor, Vec<String>), StoreError> {
        (**self).scan(cursor, pattern).await
    }

    async fn flush_db(&self) -> Result<(), StoreError> {
        (**self).flush_db().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        (**self).ping().await
    }

    fn is_persistent(&self) -> bool {
        (**self).is_persistent()
    }
}
