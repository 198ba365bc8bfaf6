//! Integration tests against a live Redis instance.
//!
//! Run with: `cargo test -- --ignored` (requires Redis on 127.0.0.1:6379).
//! Each test works under its own top-level namespace and clears it on the
//! way out, so a shared dev instance stays usable.

use canopy::{CacheConfig, Path, connect};
use chrono::Utc;

fn path(segments: &[&str]) -> Path {
    Path::new(segments.iter().copied()).unwrap()
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_put_get_clear_round_trip() {
    let cache = connect(&CacheConfig::default()).await.unwrap();
    let item = path(&["canopy-it", "roundtrip", "item"]);

    cache.put(&item, b"payload", None).await.unwrap();
    assert_eq!(cache.get(&item).await.unwrap(), Some(b"payload".to_vec()));

    cache.clear(Some(&item)).await.unwrap();
    assert_eq!(cache.get(&item).await.unwrap(), None);

    cache.clear(Some(&path(&["canopy-it"]))).await.unwrap();
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_subtree_invalidation_regenerates_keys() {
    let cache = connect(&CacheConfig::default()).await.unwrap();
    let dir = path(&["canopy-it", "subtree", "dir"]);

    cache.put(&dir, b"parent", None).await.unwrap();
    for i in 0..5 {
        let child = dir.child(format!("test{i}")).unwrap();
        cache.put(&child, b"child", None).await.unwrap();
    }

    cache.clear(Some(&dir)).await.unwrap();

    assert_eq!(cache.get(&dir).await.unwrap(), None);
    for i in 0..5 {
        let child = dir.child(format!("test{i}")).unwrap();
        assert_eq!(cache.get(&child).await.unwrap(), None);

        cache.put(&child, b"rewritten", None).await.unwrap();
        assert_eq!(cache.get(&child).await.unwrap(), Some(b"rewritten".to_vec()));
        assert_eq!(
            cache.flat_key(&child).await.unwrap(),
            format!("canopy-it:subtree:dir_1:test{i}")
        );
    }

    cache.clear(Some(&path(&["canopy-it"]))).await.unwrap();
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_expired_put_is_noop() {
    let cache = connect(&CacheConfig::default()).await.unwrap();
    let item = path(&["canopy-it", "ttl", "expired"]);

    let already_due = Utc::now() - chrono::Duration::seconds(5);
    cache.put(&item, b"never-lands", Some(already_due)).await.unwrap();

    assert_eq!(cache.get(&item).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_availability_probe() {
    let cache = connect(&CacheConfig::default()).await.unwrap();
    assert!(cache.is_available().await);
    assert!(cache.is_persistent());
}
