//! Process-local mirror of the store-side generation index.

use std::collections::HashMap;
use std::sync::Mutex;

/// Write-through cache of generation-index entries, scoped to one driver
/// instance.
///
/// Read-through-then-cache-on-write semantics: the encoder consults this map
/// first and falls back to a store read on miss, but only this process's own
/// invalidations write entries here (with the value the store's INCR
/// returned). Store reads deliberately do not populate the map: an entry
/// present here is a value this process itself bumped to, which is exactly
/// the guarantee that makes a local hit canonical for this process's
/// subsequent writes.
///
/// The map may be stale relative to the store (another worker may have
/// incremented since); no cross-process invalidation exists or is needed,
/// because a worker's own `clear` refreshes its own map immediately.
#[derive(Debug, Default)]
pub struct GenerationCache {
    entries: Mutex<HashMap<String, i64>>,
}

impl GenerationCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the locally-known generation for a generation-index key.
    #[must_use]
    pub fn get(&self, index_key: &str) -> Option<i64> {
        self.entries
            .lock()
            .expect("generation cache mutex poisoned")
            .get(index_key)
            .copied()
    }

    /// Records the generation returned by the store's INCR.
    pub fn insert(&self, index_key: String, generation: i64) {
        self.entries
            .lock()
            .expect("generation cache mutex poisoned")
            .insert(index_key, generation);
    }

    /// Forgets everything. Called after a full-store flush, which deletes the
    /// store-side entries this map mirrors.
    pub fn clear(&self) {
        self.entries
            .lock()
            .expect("generation cache mutex poisoned")
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entry_is_none() {
        let cache = GenerationCache::new();
        assert_eq!(cache.get("pathdb:cache:ns"), None);
    }

    #[test]
    fn test_insert_then_get() {
        let cache = GenerationCache::new();
        cache.insert("pathdb:cache:ns".to_string(), 3);
        assert_eq!(cache.get("pathdb:cache:ns"), Some(3));
    }

    #[test]
    fn test_insert_overwrites() {
        let cache = GenerationCache::new();
        cache.insert("pathdb:cache:ns".to_string(), 1);
        cache.insert("pathdb:cache:ns".to_string(), 2);
        assert_eq!(cache.get("pathdb:cache:ns"), Some(2));
    }

    #[test]
    fn test_clear_forgets_entries() {
        let cache = GenerationCache::new();
        cache.insert("pathdb:cache:ns".to_string(), 1);
        cache.clear();
        assert_eq!(cache.get("pathdb:cache:ns"), None);
    }
}
