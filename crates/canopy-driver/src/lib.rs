//! # Canopy Driver
//!
//! The hierarchical key index: maps tree-structured cache paths onto flat
//! store keys and invalidates whole subtrees without walking them at write
//! time.
//!
//! A path like `["cache", "ns", "dir", "item"]` encodes to the flat key
//! `cache:ns:dir:item`, until an ancestor is invalidated. Invalidation bumps
//! a per-path generation counter (kept in the store under the reserved
//! `pathdb:` prefix), and from then on every key encoded under that ancestor
//! carries a `_<generation>` suffix on the invalidated segment:
//! `cache:ns:dir_1:item`. Old-generation keys become unreachable immediately
//! and are swept out by a cursor-driven scan.
//!
//! # Example
//!
//! ```ignore
//! use canopy_core::Path;
//! use canopy_driver::Canopy;
//! use canopy_store::MemoryStore;
//!
//! let cache = Canopy::new(MemoryStore::new(), true);
//! let path = Path::new(["cache", "users", "42"])?;
//! cache.put(&path, b"profile", None).await?;
//! assert!(cache.get(&path).await?.is_some());
//! cache.clear(Some(&path.parent().unwrap())).await?;
//! assert!(cache.get(&path).await?.is_none());
//! ```

pub mod driver;
pub mod error;
pub mod generations;
pub mod keys;

// Re-export commonly used types at crate root
pub use driver::Canopy;
pub use error::CacheError;
pub use generations::GenerationCache;
pub use keys::{GENERATION_MARKER, GENERATION_PREFIX, SEPARATOR};
