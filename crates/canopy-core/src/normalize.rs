//! Segment canonicalization for normalized-key mode.
//!
//! When the driver runs with key normalization enabled (the default), every
//! path segment is canonicalized before encoding: lower-cased, with anything
//! outside `[a-z0-9.-]` stripped. The surviving alphabet contains neither the
//! flat-key separator (`:`) nor the generation marker (`_`), so normalized
//! segments never need the reserved-character check.
//!
//! Callers that need richer segment alphabets run with normalization disabled
//! and take on the reserved-character restriction instead.

use crate::path::{Path, PathError};

/// Canonicalizes a single segment: lowercase, keep only `[a-z0-9.-]`.
#[must_use]
pub fn normalize_segment(segment: &str) -> String {
    segment
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect()
}

/// Canonicalizes every segment of a path.
///
/// # Errors
///
/// Returns [`PathError::NormalizedToEmpty`] if stripping leaves any segment
/// empty (e.g. a segment made entirely of punctuation), naming the original
/// segment.
pub fn normalize_path(path: &Path) -> Result<Path, PathError> {
    let mut segments = Vec::with_capacity(path.segments().len());
    for segment in path.segments() {
        let normalized = normalize_segment(segment);
        if normalized.is_empty() {
            return Err(PathError::NormalizedToEmpty(segment.clone()));
        }
        segments.push(normalized);
    }
    Path::new(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_segment_lowercases() {
        assert_eq!(normalize_segment("UserProfiles"), "userprofiles");
    }

    #[test]
    fn test_normalize_segment_strips_whitespace_and_punctuation() {
        assert_eq!(normalize_segment("user profiles!"), "userprofiles");
    }

    #[test]
    fn test_normalize_segment_strips_reserved_characters() {
        assert_eq!(normalize_segment("a:b_c"), "abc");
    }

    #[test]
    fn test_normalize_segment_keeps_digits_dots_dashes() {
        assert_eq!(normalize_segment("item-1.v2"), "item-1.v2");
    }

    #[test]
    fn test_normalize_path_all_segments() {
        let path = Path::new(["Cache", "Name Space", "Item_7"]).unwrap();
        let normalized = normalize_path(&path).unwrap();
        assert_eq!(normalized.segments(), ["cache", "namespace", "item7"]);
    }

    #[test]
    fn test_normalize_path_rejects_fully_stripped_segment() {
        let path = Path::new(["cache", "!!!"]).unwrap();
        assert_eq!(
            normalize_path(&path),
            Err(PathError::NormalizedToEmpty("!!!".to_string()))
        );
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = normalize_segment("Mixed Case-42");
        assert_eq!(normalize_segment(&once), once);
    }
}
