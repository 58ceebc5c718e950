use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use parking_lot::RwLock;
use rowfs_kv::{KeySelector, KeyValue, KvStore, ScanResult};
use rowfs_types::Result;

/// Stored cell: version timestamp plus the row bytes.
type Cell = (i64, Vec<u8>);

/// In-memory sorted store backed by a `BTreeMap`.
///
/// Each key holds one cell stamped with a version timestamp. A put stamped
/// older than the stored cell is shadowed and leaves the row unchanged,
/// matching the versioned-cell semantics of the stores this backend stands
/// in for. Intended for tests and the example binary.
#[derive(Default)]
pub struct MemStore {
    map: RwLock<BTreeMap<Vec<u8>, Cell>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently stored.
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }

    fn collect_range(
        &self,
        begin: &KeySelector,
        end: &KeySelector,
        limit: i32,
    ) -> (Vec<KeyValue>, bool) {
        let begin_bound = if begin.inclusive {
            Bound::Included(begin.key.clone())
        } else {
            Bound::Excluded(begin.key.clone())
        };
        // An empty end key means no upper bound.
        let end_bound = if end.key.is_empty() {
            Bound::Unbounded
        } else if end.inclusive {
            Bound::Included(end.key.clone())
        } else {
            Bound::Excluded(end.key.clone())
        };

        let map = self.map.read();
        let mut kvs = Vec::new();
        let mut has_more = false;
        for (key, (_, value)) in map.range((begin_bound, end_bound)) {
            if limit >= 0 && kvs.len() >= limit as usize {
                has_more = true;
                break;
            }
            kvs.push(KeyValue {
                key: key.clone(),
                value: value.clone(),
            });
        }
        (kvs, has_more)
    }
}

#[async_trait]
impl KvStore for MemStore {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.map.read().get(key).map(|(_, v)| v.clone()))
    }

    async fn put(&self, key: &[u8], value: &[u8], timestamp: i64) -> Result<()> {
        let mut map = self.map.write();
        match map.get(key) {
            Some((stored_ts, _)) if *stored_ts > timestamp => {
                // Shadowed: the stored cell carries a newer version.
            }
            _ => {
                map.insert(key.to_vec(), (timestamp, value.to_vec()));
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &[u8]) -> Result<()> {
        self.map.write().remove(key);
        Ok(())
    }

    async fn delete_batch(&self, keys: &[Vec<u8>]) -> Result<()> {
        let mut map = self.map.write();
        for key in keys {
            map.remove(key);
        }
        Ok(())
    }

    async fn scan(
        &self,
        begin: &KeySelector,
        end: &KeySelector,
        limit: i32,
    ) -> Result<ScanResult> {
        let (kvs, has_more) = self.collect_range(begin, end, limit);
        Ok(ScanResult { kvs, has_more })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowfs_kv::prefix_scan_end_key;

    fn selector(key: &[u8], inclusive: bool) -> KeySelector {
        KeySelector::new(key.to_vec(), inclusive)
    }

    #[tokio::test]
    async fn test_get_put_delete() {
        let store = MemStore::new();
        assert_eq!(store.get(b"a").await.unwrap(), None);

        store.put(b"a", b"1", 10).await.unwrap();
        assert_eq!(store.get(b"a").await.unwrap(), Some(b"1".to_vec()));

        store.delete(b"a").await.unwrap();
        assert_eq!(store.get(b"a").await.unwrap(), None);

        // Deleting an absent key succeeds.
        store.delete(b"a").await.unwrap();
    }

    #[tokio::test]
    async fn test_put_overwrites_with_newer_timestamp() {
        let store = MemStore::new();
        store.put(b"k", b"old", 10).await.unwrap();
        store.put(b"k", b"new", 20).await.unwrap();
        assert_eq!(store.get(b"k").await.unwrap(), Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn test_put_shadowed_by_newer_cell() {
        let store = MemStore::new();
        store.put(b"k", b"newer", 20).await.unwrap();
        store.put(b"k", b"stale", 10).await.unwrap();
        assert_eq!(store.get(b"k").await.unwrap(), Some(b"newer".to_vec()));
    }

    #[tokio::test]
    async fn test_put_equal_timestamp_wins() {
        let store = MemStore::new();
        store.put(b"k", b"first", 10).await.unwrap();
        store.put(b"k", b"second", 10).await.unwrap();
        assert_eq!(store.get(b"k").await.unwrap(), Some(b"second".to_vec()));
    }

    #[tokio::test]
    async fn test_delete_batch() {
        let store = MemStore::new();
        store.put(b"a", b"1", 1).await.unwrap();
        store.put(b"b", b"2", 1).await.unwrap();
        store.put(b"c", b"3", 1).await.unwrap();

        store
            .delete_batch(&[b"a".to_vec(), b"c".to_vec(), b"x".to_vec()])
            .await
            .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(b"b").await.unwrap(), Some(b"2".to_vec()));
    }

    #[tokio::test]
    async fn test_scan_ordered() {
        let store = MemStore::new();
        store.put(b"b", b"2", 1).await.unwrap();
        store.put(b"a", b"1", 1).await.unwrap();
        store.put(b"c", b"3", 1).await.unwrap();

        let result = store
            .scan(&selector(b"a", true), &selector(b"z", false), 100)
            .await
            .unwrap();
        let keys: Vec<_> = result.kvs.iter().map(|kv| kv.key.clone()).collect();
        assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        assert!(!result.has_more);
    }

    #[tokio::test]
    async fn test_scan_bounds() {
        let store = MemStore::new();
        for k in [b"a", b"b", b"c", b"d"] {
            store.put(k, b"v", 1).await.unwrap();
        }

        // Exclusive begin, exclusive end.
        let result = store
            .scan(&selector(b"a", false), &selector(b"d", false), 100)
            .await
            .unwrap();
        let keys: Vec<_> = result.kvs.iter().map(|kv| kv.key.clone()).collect();
        assert_eq!(keys, vec![b"b".to_vec(), b"c".to_vec()]);

        // Inclusive end.
        let result = store
            .scan(&selector(b"c", true), &selector(b"d", true), 100)
            .await
            .unwrap();
        assert_eq!(result.kvs.len(), 2);
    }

    #[tokio::test]
    async fn test_scan_limit_and_has_more() {
        let store = MemStore::new();
        for i in 0u8..10 {
            store.put(&[i], b"v", 1).await.unwrap();
        }

        let result = store
            .scan(&selector(&[0], true), &selector(&[255], false), 4)
            .await
            .unwrap();
        assert_eq!(result.kvs.len(), 4);
        assert!(result.has_more);

        let result = store
            .scan(&selector(&[0], true), &selector(&[255], false), 10)
            .await
            .unwrap();
        assert_eq!(result.kvs.len(), 10);
        assert!(!result.has_more);
    }

    #[tokio::test]
    async fn test_scan_unbounded_end() {
        let store = MemStore::new();
        store.put(b"\xff\xff", b"top", 1).await.unwrap();
        store.put(b"a", b"1", 1).await.unwrap();

        // prefix_scan_end_key of an all-0xFF prefix yields the empty key,
        // which the backend treats as unbounded.
        let end = prefix_scan_end_key(b"\xff");
        let result = store
            .scan(&selector(b"a", true), &selector(&end, false), 100)
            .await
            .unwrap();
        assert_eq!(result.kvs.len(), 2);
    }

    #[tokio::test]
    async fn test_scan_empty_range() {
        let store = MemStore::new();
        store.put(b"m", b"v", 1).await.unwrap();
        let result = store
            .scan(&selector(b"x", true), &selector(b"z", false), 100)
            .await
            .unwrap();
        assert!(result.kvs.is_empty());
        assert!(!result.has_more);
    }
}
