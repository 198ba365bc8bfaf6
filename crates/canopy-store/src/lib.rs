//! # Canopy Store
//!
//! Flat key-value store interface and backends for the Canopy cache driver.
//!
//! The driver core never talks to a concrete client; it depends on the
//! [`Store`] capability trait. This crate provides the trait plus three
//! implementations:
//!
//! - [`RedisStore`]: one Redis endpoint over the `redis` crate's async
//!   connection manager
//! - [`ShardedStore`]: several endpoints with stable per-key routing
//! - [`MemoryStore`]: an ephemeral in-process store for tests and local use
//!
//! [`RedisBackend`] is the construction-time selection between the two Redis
//! variants, driven by the configured endpoint count.
//!
//! # Example
//!
//! ```ignore
//! use canopy_config::CacheConfig;
//! use canopy_store::{RedisBackend, Store};
//!
//! let config = CacheConfig::from_env()?;
//! let store = RedisBackend::connect(&config).await?;
//! store.set("greeting", b"hello").await?;
//! ```

pub mod backend;
pub mod cursor;
pub mod error;
pub mod memory;
pub mod redis;
pub mod sharded;
pub mod store;

// Re-export commonly used types at crate root
pub use backend::RedisBackend;
pub use cursor::ScanCursor;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use redis::RedisStore;
pub use sharded::ShardedStore;
pub use store::{SCAN_BATCH_HINT, Store};
