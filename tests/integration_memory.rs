//! The public surface exercised end to end on the ephemeral backend.

use canopy::{Canopy, MemoryStore, Path};

#[tokio::test]
async fn test_facade_types_compose() {
    let cache = Canopy::new(MemoryStore::new(), true);
    let item = Path::new(["cache", "ns", "item"]).unwrap();

    cache.put(&item, b"payload", None).await.unwrap();
    assert_eq!(cache.get(&item).await.unwrap(), Some(b"payload".to_vec()));

    assert!(cache.is_available().await);
    assert!(!cache.is_persistent());

    cache.clear(None).await.unwrap();
    assert_eq!(cache.get(&item).await.unwrap(), None);
}
