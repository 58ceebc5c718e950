use async_trait::async_trait;
use rowfs_types::Result;

/// Key-value pair returned from a scan.
#[derive(Debug, Clone)]
pub struct KeyValue {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

/// Key selector for range scans.
#[derive(Debug, Clone)]
pub struct KeySelector {
    pub key: Vec<u8>,
    pub inclusive: bool,
}

impl KeySelector {
    pub fn new(key: impl Into<Vec<u8>>, inclusive: bool) -> Self {
        Self {
            key: key.into(),
            inclusive,
        }
    }
}

/// Result of a bounded range scan.
#[derive(Debug)]
pub struct ScanResult {
    pub kvs: Vec<KeyValue>,
    pub has_more: bool,
}

/// The flat sorted store the namespace core runs on.
///
/// Atomicity holds for a single `put` or `delete` only. `delete_batch` is a
/// convenience that is atomic per key with no cross-key guarantee. `put`
/// carries a version timestamp: the store keeps the highest-stamped cell per
/// key, so a write stamped older than the stored cell is shadowed.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the row at `key`. Absence is a normal outcome, not a failure.
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Atomically write the full row at `key` with the given version
    /// timestamp (epoch milliseconds).
    async fn put(&self, key: &[u8], value: &[u8], timestamp: i64) -> Result<()>;

    /// Atomically delete the row at `key`. Deleting an absent key succeeds.
    async fn delete(&self, key: &[u8]) -> Result<()>;

    /// Delete each listed key. Atomic per key only; an interruption can
    /// leave any subset deleted.
    async fn delete_batch(&self, keys: &[Vec<u8>]) -> Result<()>;

    /// Ordered forward scan over `[begin, end)` (bounds per the selectors),
    /// returning at most `limit` rows and whether more remain.
    async fn scan(
        &self,
        begin: &KeySelector,
        end: &KeySelector,
        limit: i32,
    ) -> Result<ScanResult>;
}
