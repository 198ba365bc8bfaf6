//! Ephemeral in-process store.
//!
//! A [`MemoryStore`] backs the driver with a plain map: handy for tests and
//! for callers that want the hierarchical-key semantics without a server.
//! It reports itself non-persistent through the persistence probe.
//!
//! SCAN is modeled on Redis's guarantees rather than idealized: iteration
//! walks fixed-size windows of the insertion-ordered keyspace, filtering each
//! window against the pattern, so a batch can legitimately come back empty
//! while later windows still hold matches, which is exactly the behavior sweep loops
//! must tolerate against real Redis.

use crate::cursor::ScanCursor;
use crate::error::StoreError;
use crate::store::Store;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default number of keyspace slots examined per scan batch.
const DEFAULT_SCAN_PAGE: u64 = 10;

struct MemoryEntry {
    key: String,
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Default)]
struct Inner {
    /// Entries by insertion sequence number. Sequence numbers are never
    /// reused, so deletions leave holes and scan windows over a sparse range
    /// produce the empty batches the sweep contract requires callers to
    /// tolerate.
    by_seq: BTreeMap<u64, MemoryEntry>,
    by_key: HashMap<String, u64>,
    next_seq: u64,
}

impl Inner {
    fn upsert(&mut self, key: &str, value: Vec<u8>, expires_at: Option<Instant>) {
        if let Some(seq) = self.by_key.get(key) {
            let entry = self
                .by_seq
                .get_mut(seq)
                .expect("by_key and by_seq out of sync");
            entry.value = value;
            entry.expires_at = expires_at;
        } else {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.by_seq.insert(
                seq,
                MemoryEntry {
                    key: key.to_string(),
                    value,
                    expires_at,
                },
            );
            self.by_key.insert(key.to_string(), seq);
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(seq) = self.by_key.remove(key) {
            self.by_seq.remove(&seq);
        }
    }
}

/// In-process store over a mutex-guarded map.
pub struct MemoryStore {
    inner: Mutex<Inner>,
    scan_page: u64,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("scan_page", &self.scan_page)
            .finish_non_exhaustive()
    }
}

impl MemoryStore {
    /// Creates an empty store with the default scan window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_scan_page(DEFAULT_SCAN_PAGE)
    }

    /// Creates an empty store scanning `scan_page` keyspace slots per batch.
    ///
    /// Small pages make non-terminal empty scan batches easy to provoke in
    /// tests.
    #[must_use]
    pub fn with_scan_page(scan_page: u64) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            scan_page: scan_page.max(1),
        }
    }

    /// Number of live (unexpired) keys. Test helper.
    #[must_use]
    pub fn key_count(&self) -> usize {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        let now = Instant::now();
        inner
            .by_seq
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut inner = self.inner.lock().expect("memory store mutex poisoned");
        let now = Instant::now();
        match inner.by_key.get(key).copied() {
            Some(seq) if inner.by_seq[&seq].is_expired(now) => {
                inner.remove(key);
                Ok(None)
            }
            Some(seq) => Ok(Some(inner.by_seq[&seq].value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store mutex poisoned");
        inner.upsert(key, value.to_vec(), None);
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store mutex poisoned");
        let expires_at = Instant::now() + Duration::from_secs(ttl_seconds);
        inner.upsert(key, value.to_vec(), Some(expires_at));
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store mutex poisoned");
        inner.remove(key);
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().expect("memory store mutex poisoned");
        let now = Instant::now();

        let current = match inner.by_key.get(key) {
            Some(seq) => {
                let entry = &inner.by_seq[seq];
                if entry.is_expired(now) {
                    0
                } else {
                    std::str::from_utf8(&entry.value)
                        .ok()
                        .and_then(|text| text.parse::<i64>().ok())
                        .ok_or_else(|| StoreError::NonNumericValue(key.to_string()))?
                }
            }
            None => 0,
        };

        let next = current + 1;
        inner.upsert(key, next.to_string().into_bytes(), None);
        Ok(next)
    }

    async fn scan(
        &self,
        cursor: ScanCursor,
        pattern: &str,
    ) -> Result<(ScanCursor, Vec<String>), StoreError> {
        let inner = self.inner.lock().expect("memory store mutex poisoned");
        let now = Instant::now();

        let start = cursor.cursor();
        let end = start.saturating_add(self.scan_page);

        let keys = inner
            .by_seq
            .range(start..end)
            .filter(|(_, entry)| !entry.is_expired(now))
            .filter(|(_, entry)| glob_match(pattern.as_bytes(), entry.key.as_bytes()))
            .map(|(_, entry)| entry.key.clone())
            .collect();

        let next = if end >= inner.next_seq {
            ScanCursor::finished()
        } else {
            ScanCursor::resume(0, end)
        };

        Ok((next, keys))
    }

    async fn flush_db(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store mutex poisoned");
        *inner = Inner::default();
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}

/// Matches the subset of Redis glob syntax the driver emits: literal bytes,
/// `*`, `?`, and backslash escapes.
fn glob_match(pattern: &[u8], text: &[u8]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some((b'*', rest)) => (0..=text.len()).any(|skip| glob_match(rest, &text[skip..])),
        Some((b'?', rest)) => !text.is_empty() && glob_match(rest, &text[1..]),
        Some((b'\\', rest)) => match rest.split_first() {
            Some((literal, rest)) => {
                text.first() == Some(literal) && glob_match(rest, &text[1..])
            }
            // A trailing backslash matches itself, as in Redis.
            None => text == b"\\",
        },
        Some((literal, rest)) => text.first() == Some(literal) && glob_match(rest, &text[1..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get_round_trip() {
        let store = MemoryStore::new();
        store.set("a:b", b"value").await.unwrap();
        assert_eq!(store.get("a:b").await.unwrap(), Some(b"value".to_vec()));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_del_removes_key() {
        let store = MemoryStore::new();
        store.set("a", b"1").await.unwrap();
        store.del("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_del_missing_is_ok() {
        let store = MemoryStore::new();
        assert!(store.del("never-stored").await.is_ok());
    }

    #[tokio::test]
    async fn test_incr_from_absent_starts_at_one() {
        let store = MemoryStore::new();
        assert_eq!(store.incr("counter").await.unwrap(), 1);
        assert_eq!(store.incr("counter").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_incr_non_numeric_value_errors() {
        let store = MemoryStore::new();
        store.set("counter", b"not a number").await.unwrap();
        let result = store.incr("counter").await;
        assert!(matches!(result, Err(StoreError::NonNumericValue(_))));
    }

    #[tokio::test]
    async fn test_set_ex_expires() {
        let store = MemoryStore::new();
        store.set_ex("short", b"lived", 1).await.unwrap();
        assert_eq!(store.get("short").await.unwrap(), Some(b"lived".to_vec()));
        std::thread::sleep(Duration::from_millis(1100));
        assert_eq!(store.get("short").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_flush_db_clears_everything() {
        let store = MemoryStore::new();
        store.set("a", b"1").await.unwrap();
        store.set("b", b"2").await.unwrap();
        store.flush_db().await.unwrap();
        assert_eq!(store.key_count(), 0);
    }

    #[tokio::test]
    async fn test_scan_visits_all_matches_across_batches() {
        let store = MemoryStore::with_scan_page(2);
        for i in 0..5 {
            store.set(&format!("match:{i}"), b"x").await.unwrap();
            store.set(&format!("other:{i}"), b"x").await.unwrap();
        }

        let mut found = Vec::new();
        let mut cursor = ScanCursor::start();
        loop {
            let (next, keys) = store.scan(cursor, "match:*").await.unwrap();
            found.extend(keys);
            if next.is_exhausted() {
                break;
            }
            cursor = next;
        }

        found.sort();
        let expected: Vec<String> = (0..5).map(|i| format!("match:{i}")).collect();
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn test_scan_returns_empty_batches_before_exhaustion() {
        let store = MemoryStore::with_scan_page(2);
        // Fill the first windows with non-matching keys so early batches are
        // empty while matches still lie ahead.
        for i in 0..6 {
            store.set(&format!("filler:{i}"), b"x").await.unwrap();
        }
        store.set("match:final", b"x").await.unwrap();

        let mut batches = Vec::new();
        let mut cursor = ScanCursor::start();
        loop {
            let (next, keys) = store.scan(cursor, "match:*").await.unwrap();
            batches.push(keys);
            if next.is_exhausted() {
                break;
            }
            cursor = next;
        }

        assert!(
            batches.iter().any(Vec::is_empty),
            "expected at least one empty intermediate batch: {batches:?}"
        );
        let all: Vec<String> = batches.into_iter().flatten().collect();
        assert_eq!(all, vec!["match:final".to_string()]);
    }

    #[test]
    fn test_glob_literal_match() {
        assert!(glob_match(b"a:b", b"a:b"));
        assert!(!glob_match(b"a:b", b"a:c"));
    }

    #[test]
    fn test_glob_star_matches_any_suffix() {
        assert!(glob_match(b"a:*", b"a:"));
        assert!(glob_match(b"a:*", b"a:b:c"));
        assert!(!glob_match(b"a:*", b"ab"));
    }

    #[test]
    fn test_glob_question_mark_matches_one() {
        assert!(glob_match(b"a?c", b"abc"));
        assert!(!glob_match(b"a?c", b"ac"));
    }

    #[test]
    fn test_glob_escaped_star_is_literal() {
        assert!(glob_match(b"a\\*b", b"a*b"));
        assert!(!glob_match(b"a\\*b", b"axb"));
    }
}
