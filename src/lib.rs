//! # Canopy
//!
//! A caching driver that maps a hierarchical cache-key namespace onto flat
//! Redis storage, with subtree invalidation that never walks the tree at
//! write time.
//!
//! Logical cache locations are [`Path`]s (ordered segment lists like
//! `["cache", "ns", "dir", "item"]`), encoded into flat store keys
//! (`cache:ns:dir:item`). Clearing a path with descendants bumps a per-path
//! generation counter; from then on keys under that path encode with a
//! `_<generation>` suffix (`cache:ns:dir_1:item`), so stale descendants fall
//! out of reach immediately while a background-free cursor sweep deletes
//! them from the store.
//!
//! # Example
//!
//! ```ignore
//! use canopy::{CacheConfig, Path, connect};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CacheConfig::from_env()?;
//!     let cache = connect(&config).await?;
//!
//!     let item = Path::new(["cache", "ns", "dir", "item"])?;
//!     cache.put(&item, b"payload", None).await?;
//!     assert!(cache.get(&item).await?.is_some());
//!
//!     // Drop the whole directory, descendants included.
//!     let dir = Path::new(["cache", "ns", "dir"])?;
//!     cache.clear(Some(&dir)).await?;
//!     assert!(cache.get(&item).await?.is_none());
//!     Ok(())
//! }
//! ```
//!
//! The driver core is store-agnostic: it depends on the [`Store`] trait, with
//! Redis (single endpoint or sharded) and in-memory implementations provided.

pub use canopy_config::{CacheConfig, ConfigError, Endpoint};
pub use canopy_core::{Path, PathError};
pub use canopy_driver::{Canopy, CacheError, GENERATION_PREFIX, SEPARATOR};
pub use canopy_store::{
    MemoryStore, RedisBackend, RedisStore, ScanCursor, ShardedStore, Store, StoreError,
};

/// A driver connected to the configured Redis backend.
pub type RedisCanopy = Canopy<RedisBackend>;

/// Connects to Redis per `config` and wraps it in a driver.
///
/// One configured endpoint yields a direct connection; several yield the
/// key-routing sharded backend. The driver inherits `config.normalize_keys`.
///
/// # Errors
///
/// Returns [`StoreError::Config`] for an unusable endpoint list and
/// [`StoreError::Redis`] if connecting fails.
pub async fn connect(config: &CacheConfig) -> Result<RedisCanopy, StoreError> {
    let store = RedisBackend::connect(config).await?;
    Ok(Canopy::new(store, config.normalize_keys))
}
