//! Error type for store operations.

use canopy_config::ConfigError;
use thiserror::Error;

/// Error type for store operations.
///
/// The driver never retries or reclassifies these; a failed store call is the
/// failed result of the in-flight cache operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection or command failure from the Redis client.
    #[error("redis command failed: {0}")]
    Redis(#[from] redis::RedisError),

    /// The configuration handed to a store constructor was rejected.
    #[error("invalid store configuration: {0}")]
    Config(#[from] ConfigError),

    /// INCR was issued against a key holding a non-integer value.
    #[error("existing value for `{0}` is not an integer")]
    NonNumericValue(String),
}
