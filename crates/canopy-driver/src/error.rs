//! Error type for cache operations.

use canopy_core::PathError;
use canopy_store::StoreError;
use thiserror::Error;

/// Error type for cache operations.
///
/// Two failure classes exist: the caller handed over an unusable path
/// (rejected before any store call), or the store itself failed (propagated
/// unmodified; the driver performs no retries and no reclassification).
/// A missing key is never an error; `get` reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The path is invalid under the driver's key settings.
    #[error("invalid cache path: {0}")]
    Path(#[from] PathError),

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
