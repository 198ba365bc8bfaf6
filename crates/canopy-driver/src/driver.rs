//! The cache driver: encoding, invalidation, and the read/write surface.

use crate::error::CacheError;
use crate::generations::GenerationCache;
use crate::keys::{self, GENERATION_MARKER, GENERATION_PREFIX, SEPARATOR};
use canopy_core::normalize::normalize_path;
use canopy_core::Path;
use canopy_store::{ScanCursor, Store};
use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

/// Hierarchical cache driver over a flat key-value store.
///
/// One value per driver instance, shared store connection, serial store
/// calls. Cross-process coordination happens entirely through the store:
/// the generation-index INCR is the only synchronization point.
#[derive(Debug)]
pub struct Canopy<S> {
    store: S,
    generations: GenerationCache,
    normalize_keys: bool,
}

impl<S: Store> Canopy<S> {
    /// Creates a driver over `store`.
    ///
    /// With `normalize_keys` on (the default configuration), path segments
    /// are canonicalized before encoding; with it off, segments are used
    /// verbatim and must not contain `:` or `_`.
    pub fn new(store: S, normalize_keys: bool) -> Self {
        Self {
            store,
            generations: GenerationCache::new(),
            normalize_keys,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads the raw bytes cached at `path`, or `None` if absent.
    ///
    /// The payload envelope (value plus expiration metadata) is the calling
    /// cache framework's format; the driver does not look inside it.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Path` for an invalid path and `CacheError::Store`
    /// if the store fails. A missing key is `Ok(None)`, not an error.
    #[instrument(skip(self), fields(cache.operation = "GET"))]
    pub async fn get(&self, path: &Path) -> Result<Option<Vec<u8>>, CacheError> {
        let key = self.key_string(path, false).await?;
        let value = self.store.get(&key).await?;
        debug!(cache.key = %key, cache.hit = value.is_some(), "Cache read");
        Ok(value)
    }

    /// Writes `value` at `path`.
    ///
    /// Without an expiration the entry is stored unconditionally. With one,
    /// the remaining time-to-live is computed against the current clock; if
    /// less than one second remains the write is skipped and reported as
    /// success, since handing the store a zero TTL would cache the entry forever.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Path` for an invalid path and `CacheError::Store`
    /// if the store fails.
    #[instrument(skip(self, value), fields(cache.operation = "SET"))]
    pub async fn put(
        &self,
        path: &Path,
        value: &[u8],
        expiration: Option<DateTime<Utc>>,
    ) -> Result<(), CacheError> {
        let key = self.key_string(path, false).await?;

        match expiration {
            None => self.store.set(&key, value).await?,
            Some(expiration) => {
                let ttl = (expiration - Utc::now()).num_seconds();
                if ttl < 1 {
                    debug!(cache.key = %key, "Expiration already due; skipping write");
                    return Ok(());
                }
                self.store.set_ex(&key, value, ttl as u64).await?;
            }
        }

        debug!(cache.key = %key, "Cache write");
        Ok(())
    }

    /// Clears a subtree, or the whole database.
    ///
    /// `Some(path)` deletes the entry at `path` and, if it has descendants,
    /// bumps the path's generation and sweeps every old-generation
    /// descendant. `None` flushes the selected store database outright and
    /// forgets the process-local generation map (the store-side entries it
    /// mirrored are gone with the flush).
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Store` if the store fails. A failure mid-sweep
    /// leaves the generation already bumped and the sweep incomplete: the
    /// leftover keys are unreachable under the new generation and age out by
    /// their own TTL. Nothing retries the sweep.
    #[instrument(skip(self), fields(cache.operation = "CLEAR"))]
    pub async fn clear(&self, path: Option<&Path>) -> Result<(), CacheError> {
        match path {
            Some(path) => self.invalidate(path).await,
            None => {
                self.store.flush_db().await?;
                self.generations.clear();
                debug!("Flushed store database");
                Ok(())
            }
        }
    }

    /// Reaps expired entries. A no-op: expiry is store-native TTL.
    pub async fn purge(&self) -> Result<(), CacheError> {
        Ok(())
    }

    /// Whether the store currently answers a ping.
    pub async fn is_available(&self) -> bool {
        self.store.ping().await.is_ok()
    }

    /// Whether cached data survives this process.
    pub fn is_persistent(&self) -> bool {
        self.store.is_persistent()
    }

    /// Encodes `path` to the flat data key it currently maps to.
    ///
    /// Recomputed on every operation; never cache the result across calls,
    /// since any ancestor invalidation changes the answer.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Path` for an invalid path and `CacheError::Store`
    /// if a generation lookup fails.
    pub async fn flat_key(&self, path: &Path) -> Result<String, CacheError> {
        self.key_string(path, false).await
    }

    /// Deletes the entry at `path` and, when descendants exist, regenerates
    /// the subtree: INCR the generation index, refresh the local mirror, then
    /// sweep the old-generation keys.
    ///
    /// The order is the point. Bumping the generation *before* the sweep
    /// means a write racing with this call either encodes under the new
    /// generation and survives, or encodes under the old one and is swept;
    /// it can never land somewhere future reads reach but the sweep missed.
    async fn invalidate(&self, path: &Path) -> Result<(), CacheError> {
        let key = self.key_string(path, false).await?;
        self.store.del(&key).await?;

        let pattern = keys::descendant_pattern(&key);
        if self.has_descendants(&pattern).await? {
            let index_key = self.key_string(path, true).await?;
            let generation = self.store.incr(&index_key).await?;
            self.generations.insert(index_key, generation);

            let swept = self.sweep(&pattern).await?;
            debug!(
                cache.key = %key,
                cache.generation = generation,
                cache.swept = swept,
                "Invalidated subtree"
            );
        } else {
            debug!(cache.key = %key, "Deleted leaf entry");
        }

        Ok(())
    }

    /// Whether any stored key is a strict descendant of the key `pattern`
    /// was built from.
    ///
    /// Drives the cursor to exhaustion before concluding "no": a scan batch
    /// can be empty while later batches still hold matches.
    async fn has_descendants(&self, pattern: &str) -> Result<bool, CacheError> {
        let mut cursor = ScanCursor::start();
        loop {
            let (next, keys) = self.store.scan(cursor, pattern).await?;
            if !keys.is_empty() {
                return Ok(true);
            }
            if next.is_exhausted() {
                return Ok(false);
            }
            cursor = next;
        }
    }

    /// Deletes every key matching `pattern`, scanning until the cursor is
    /// exhausted. Returns the number of keys deleted.
    async fn sweep(&self, pattern: &str) -> Result<u64, CacheError> {
        let mut deleted = 0u64;
        let mut cursor = ScanCursor::start();
        loop {
            let (next, keys) = self.store.scan(cursor, pattern).await?;
            for key in &keys {
                self.store.del(key).await?;
                deleted += 1;
            }
            if next.is_exhausted() {
                break;
            }
            cursor = next;
        }
        Ok(deleted)
    }

    /// Encodes `path` into a flat key.
    ///
    /// Walks the segments root-first, appending each and, for data keys,
    /// consulting the generation index for the accumulated prefix (local
    /// mirror first, store on miss) to decide whether a `_<generation>`
    /// suffix follows the segment.
    ///
    /// With `ancestor_index_key` set the suffix lookups are skipped entirely
    /// (the index key must not depend on its own suffix) and the result is
    /// prefixed with the reserved generation-index namespace.
    async fn key_string(&self, path: &Path, ancestor_index_key: bool) -> Result<String, CacheError> {
        let path = if self.normalize_keys {
            normalize_path(path)?
        } else {
            path.ensure_verbatim_safe()?;
            path.clone()
        };

        let mut key = String::new();
        for segment in path.segments() {
            key.push_str(segment);

            if !ancestor_index_key {
                let index_key = format!("{GENERATION_PREFIX}{key}");
                let generation = self.generation_for(&index_key).await?;
                if generation != 0 {
                    key.push(GENERATION_MARKER);
                    key.push_str(&generation.to_string());
                }
            }

            key.push(SEPARATOR);
        }
        key.pop();

        if ancestor_index_key {
            key.insert_str(0, GENERATION_PREFIX);
        }
        Ok(key)
    }

    /// Current generation for a generation-index key: local mirror first,
    /// store read on miss. Absence is generation 0.
    async fn generation_for(&self, index_key: &str) -> Result<i64, CacheError> {
        if let Some(generation) = self.generations.get(index_key) {
            return Ok(generation);
        }

        match self.store.get(index_key).await? {
            Some(raw) => {
                match std::str::from_utf8(&raw).ok().and_then(|v| v.parse().ok()) {
                    Some(generation) => Ok(generation),
                    None => {
                        // Only INCR writes under the reserved prefix, so a
                        // non-integer here is foreign data; read it as absent.
                        warn!(cache.index_key = %index_key, "Non-integer generation entry ignored");
                        Ok(0)
                    }
                }
            }
            None => Ok(0),
        }
    }
}
