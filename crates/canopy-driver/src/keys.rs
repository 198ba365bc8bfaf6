//! Flat-key syntax: separators, generation suffixes, reserved namespaces.

/// Separator between encoded path segments in a flat key.
pub const SEPARATOR: char = ':';

/// Marker joining a segment to its generation suffix (`dir_1`).
pub const GENERATION_MARKER: char = '_';

/// Reserved namespace prefix for generation-index entries. Lives in the same
/// flat keyspace as the data but can never collide with it: data keys start
/// with a path segment, and segments cannot contain `:`.
pub const GENERATION_PREFIX: &str = "pathdb:";

/// Builds the scan pattern matching strict descendants of `flat_key`.
///
/// The trailing separator is what keeps the match strict: `a:b:*` catches
/// descendants of `a:b` but not the sibling `a:bc` and not the re-generation
/// `a:b_1` or anything under it. Glob metacharacters inside the key itself
/// are escaped so verbatim segments cannot widen the match.
#[must_use]
pub fn descendant_pattern(flat_key: &str) -> String {
    let mut pattern = String::with_capacity(flat_key.len() + 2);
    for c in flat_key.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push(SEPARATOR);
    pattern.push('*');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descendant_pattern_appends_separator_and_star() {
        assert_eq!(descendant_pattern("cache:ns:dir"), "cache:ns:dir:*");
    }

    #[test]
    fn test_descendant_pattern_escapes_glob_metacharacters() {
        assert_eq!(descendant_pattern("cache:a*b"), "cache:a\\*b:*");
        assert_eq!(descendant_pattern("cache:a?b"), "cache:a\\?b:*");
        assert_eq!(descendant_pattern("cache:a[1]"), "cache:a\\[1\\]:*");
    }
}
