//! Hierarchical cache paths.
//!
//! A [`Path`] is an ordered sequence of string segments naming a location in
//! the logical cache namespace, e.g. `["cache", "namespace", "test",
//! "directory", "item"]`. The hierarchy is never materialized as a tree
//! structure anywhere: ancestry is encoded entirely in string prefixes of the
//! flat keys derived from paths, so this type is deliberately nothing more
//! than a validated list of segments.
//!
//! # Validation
//!
//! Construction rejects empty paths and empty segments. Reserved-character
//! checks (`:` and `_`) are *not* applied here: whether those characters are
//! legal depends on the driver's key-normalization setting, so the driver
//! enforces them at encode time via [`Path::ensure_verbatim_safe`].

use thiserror::Error;

/// Characters that cannot appear in verbatim (unnormalized) segments.
///
/// `:` is the flat-key separator and `_` introduces generation suffixes; a
/// segment containing either would be indistinguishable from the encoder's
/// own syntax once embedded in a flat key.
pub const RESERVED_SEGMENT_CHARS: [char; 2] = [':', '_'];

/// Error type for path construction and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path contained no segments at all.
    #[error("cache path must contain at least one segment")]
    Empty,

    /// A segment was the empty string.
    #[error("cache path segments must not be empty")]
    EmptySegment,

    /// A verbatim segment contained `:` or `_`.
    #[error("segment `{0}` contains a reserved character (`:` or `_`); not allowed when key normalization is off")]
    ReservedCharacter(String),

    /// Normalization stripped every character of a segment.
    #[error("segment `{0}` is empty after normalization")]
    NormalizedToEmpty(String),
}

/// An ordered, non-empty sequence of non-empty segments naming a location in
/// the logical cache namespace.
///
/// # Example
///
/// ```
/// use canopy_core::Path;
///
/// let path = Path::new(["cache", "users", "42"]).unwrap();
/// assert_eq!(path.segments(), ["cache", "users", "42"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Creates a path from an ordered sequence of segments.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Empty`] if the sequence has no segments and
    /// [`PathError::EmptySegment`] if any segment is the empty string.
    pub fn new<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();

        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment);
        }

        Ok(Self { segments })
    }

    /// The path's segments, root first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the parent path, or `None` for a single-segment path.
    #[must_use]
    pub fn parent(&self) -> Option<Path> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Path {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Returns a new path with `segment` appended.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EmptySegment`] if `segment` is empty.
    pub fn child(&self, segment: impl Into<String>) -> Result<Path, PathError> {
        let segment = segment.into();
        if segment.is_empty() {
            return Err(PathError::EmptySegment);
        }
        let mut segments = self.segments.clone();
        segments.push(segment);
        Ok(Path { segments })
    }

    /// Checks that every segment is free of [`RESERVED_SEGMENT_CHARS`].
    ///
    /// The driver calls this before encoding when key normalization is off;
    /// normalized segments cannot contain reserved characters so the check is
    /// skipped in that mode.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::ReservedCharacter`] naming the first offending
    /// segment.
    pub fn ensure_verbatim_safe(&self) -> Result<(), PathError> {
        for segment in &self.segments {
            if segment.contains(RESERVED_SEGMENT_CHARS) {
                return Err(PathError::ReservedCharacter(segment.clone()));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Path {
    /// Formats the logical path as `a/b/c` for diagnostics.
    ///
    /// This is *not* the flat-key encoding; flat keys depend on generation
    /// state and are produced by the driver.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid_path() {
        let path = Path::new(["cache", "namespace", "item"]).unwrap();
        assert_eq!(path.segments(), ["cache", "namespace", "item"]);
    }

    #[test]
    fn test_new_empty_path_rejected() {
        let segments: Vec<String> = vec![];
        assert_eq!(Path::new(segments), Err(PathError::Empty));
    }

    #[test]
    fn test_new_empty_segment_rejected() {
        assert_eq!(Path::new(["cache", ""]), Err(PathError::EmptySegment));
    }

    #[test]
    fn test_parent_of_nested_path() {
        let path = Path::new(["a", "b", "c"]).unwrap();
        let parent = path.parent().unwrap();
        assert_eq!(parent.segments(), ["a", "b"]);
    }

    #[test]
    fn test_parent_of_root_is_none() {
        let path = Path::new(["a"]).unwrap();
        assert!(path.parent().is_none());
    }

    #[test]
    fn test_child_appends_segment() {
        let path = Path::new(["a", "b"]).unwrap();
        let child = path.child("c").unwrap();
        assert_eq!(child.segments(), ["a", "b", "c"]);
    }

    #[test]
    fn test_child_empty_segment_rejected() {
        let path = Path::new(["a"]).unwrap();
        assert_eq!(path.child(""), Err(PathError::EmptySegment));
    }

    #[test]
    fn test_verbatim_safe_accepts_clean_segments() {
        let path = Path::new(["cache", "name-space", "item.v2"]).unwrap();
        assert!(path.ensure_verbatim_safe().is_ok());
    }

    #[test]
    fn test_verbatim_safe_rejects_separator() {
        let path = Path::new(["cache", "bad:seg"]).unwrap();
        assert_eq!(
            path.ensure_verbatim_safe(),
            Err(PathError::ReservedCharacter("bad:seg".to_string()))
        );
    }

    #[test]
    fn test_verbatim_safe_rejects_generation_marker() {
        let path = Path::new(["cache", "bad_seg"]).unwrap();
        assert_eq!(
            path.ensure_verbatim_safe(),
            Err(PathError::ReservedCharacter("bad_seg".to_string()))
        );
    }

    #[test]
    fn test_display_uses_slashes() {
        let path = Path::new(["a", "b", "c"]).unwrap();
        assert_eq!(path.to_string(), "a/b/c");
    }
}
