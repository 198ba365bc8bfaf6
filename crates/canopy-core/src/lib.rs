//! # Canopy Core
//!
//! Path model and segment normalization for the Canopy cache driver.
//!
//! This crate provides the foundational types shared by the rest of the
//! workspace:
//!
//! - [`path`]: the hierarchical [`Path`] type and its validation errors
//! - [`normalize`]: segment canonicalization for normalized-key mode
//!
//! # Example
//!
//! ```
//! use canopy_core::Path;
//!
//! let path = Path::new(["cache", "namespace", "test", "directory"]).unwrap();
//! assert_eq!(path.segments().len(), 4);
//! ```

pub mod normalize;
pub mod path;

// Re-export commonly used types at crate root
pub use path::{Path, PathError, RESERVED_SEGMENT_CHARS};
