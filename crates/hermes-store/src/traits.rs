use crate::error::KvResult;

/// A key and its raw value, as returned by a scan.
pub type ScanEntry = (String, Vec<u8>);

/// Ordered, durable key-value store.
///
/// All implementations must satisfy these invariants:
/// - Keys are ordered lexicographically by their UTF-8 bytes.
/// - `insert` is atomic and create-only: it either stores the value under a
///   fresh key or fails without touching the store.
/// - `scan_prefix` observes a consistent snapshot taken when the scan starts.
///   A concurrently committing write may or may not be visible.
/// - Implementations are safe to share across threads.
pub trait KeyValueStore: Send + Sync {
    /// Point lookup.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>>;

    /// Write `value` under a key that must not exist yet.
    ///
    /// Returns [`KvError::AlreadyExists`](crate::KvError::AlreadyExists) if
    /// the key is taken. The write is durable once this returns `Ok`.
    fn insert(&self, key: &str, value: &[u8]) -> KvResult<()>;

    /// Return up to `limit` entries whose key starts with `prefix`, in key
    /// order.
    ///
    /// When `after` is given the scan resumes strictly after that key, which
    /// makes a scan restartable page by page.
    fn scan_prefix(&self, prefix: &str, after: Option<&str>, limit: usize)
        -> KvResult<Vec<ScanEntry>>;

    /// Total number of keys in the store.
    fn len(&self) -> KvResult<u64>;

    /// Returns `true` if the store holds no keys.
    fn is_empty(&self) -> KvResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Check whether a key exists.
    fn exists(&self, key: &str) -> KvResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Lower bound for a prefix scan that may resume after a previous key.
///
/// Returns the key to resume after, or `None` when the scan should start at
/// the prefix itself (no cursor, or a cursor sorting before the prefix).
pub(crate) fn resume_after<'a>(prefix: &str, after: Option<&'a str>) -> Option<&'a str> {
    after.filter(|a| *a >= prefix)
}
