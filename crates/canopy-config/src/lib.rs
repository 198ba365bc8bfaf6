//! # Canopy Config
//!
//! Configuration types for the Canopy cache driver.
//!
//! This crate provides the driver's configuration surface, loaded from
//! environment variables or embedded in a host application's own
//! (serde-compatible) configuration tree:
//!
//! - [`cache`]: the [`CacheConfig`] option set
//! - [`endpoint`]: server [`Endpoint`] descriptors (TCP or Unix socket)
//!
//! # Example
//!
//! ```
//! use canopy_config::CacheConfig;
//!
//! let config = CacheConfig::default();
//! assert_eq!(config.servers.len(), 1);
//! assert!(config.normalize_keys);
//! ```

pub mod cache;
pub mod endpoint;

// Re-export commonly used types at crate root
pub use cache::CacheConfig;
pub use endpoint::{ConfigError, Endpoint};
