use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

use crate::error::{KvError, KvResult};
use crate::traits::{resume_after, KeyValueStore, ScanEntry};

/// In-memory, `BTreeMap`-based key-value store.
///
/// Intended for tests and embedding. Entries are held behind a `RwLock`; a
/// scan holds the read lock for its whole duration, which gives it a
/// snapshot view. Nothing survives a drop.
pub struct InMemoryKvStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryKvStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Return all keys in order.
    pub fn keys(&self) -> KvResult<Vec<String>> {
        let map = self
            .entries
            .read()
            .map_err(|e| KvError::LockPoisoned(e.to_string()))?;
        Ok(map.keys().cloned().collect())
    }

    /// Store `value` under `key` regardless of what is already there.
    ///
    /// Bypasses the create-only rule; tests use it to plant corrupt records.
    pub fn put_raw(&self, key: &str, value: &[u8]) -> KvResult<()> {
        let mut map = self
            .entries
            .write()
            .map_err(|e| KvError::LockPoisoned(e.to_string()))?;
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryKvStore {
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        let map = self
            .entries
            .read()
            .map_err(|e| KvError::LockPoisoned(e.to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn insert(&self, key: &str, value: &[u8]) -> KvResult<()> {
        let mut map = self
            .entries
            .write()
            .map_err(|e| KvError::LockPoisoned(e.to_string()))?;
        if map.contains_key(key) {
            return Err(KvError::AlreadyExists(key.to_string()));
        }
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn scan_prefix(
        &self,
        prefix: &str,
        after: Option<&str>,
        limit: usize,
    ) -> KvResult<Vec<ScanEntry>> {
        let map = self
            .entries
            .read()
            .map_err(|e| KvError::LockPoisoned(e.to_string()))?;
        let lower = match resume_after(prefix, after) {
            Some(after) => Bound::Excluded(after),
            None => Bound::Included(prefix),
        };
        Ok(map
            .range::<str, _>((lower, Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .take(limit)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn len(&self) -> KvResult<u64> {
        let map = self
            .entries
            .read()
            .map_err(|e| KvError::LockPoisoned(e.to_string()))?;
        Ok(map.len() as u64)
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len().unwrap_or_default();
        f.debug_struct("InMemoryKvStore")
            .field("key_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> InMemoryKvStore {
        let store = InMemoryKvStore::new();
        for key in ["alice/2", "alice/1", "alice/3", "alicia/1", "bob/1"] {
            store.insert(key, key.as_bytes()).unwrap();
        }
        store
    }

    fn keys(entries: &[ScanEntry]) -> Vec<&str> {
        entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn insert_and_get() {
        let store = InMemoryKvStore::new();
        store.insert("a/1", b"one").unwrap();
        assert_eq!(store.get("a/1").unwrap(), Some(b"one".to_vec()));
        assert_eq!(store.get("a/2").unwrap(), None);
        assert!(store.exists("a/1").unwrap());
    }

    #[test]
    fn insert_is_create_only() {
        let store = InMemoryKvStore::new();
        store.insert("a/1", b"first").unwrap();
        let err = store.insert("a/1", b"second").unwrap_err();
        assert!(matches!(err, KvError::AlreadyExists(ref k) if k == "a/1"));
        assert_eq!(store.get("a/1").unwrap(), Some(b"first".to_vec()));
    }

    #[test]
    fn prefix_scan_is_ordered_and_scoped() {
        let store = seeded();
        let entries = store.scan_prefix("alice/", None, 100).unwrap();
        assert_eq!(keys(&entries), vec!["alice/1", "alice/2", "alice/3"]);
    }

    #[test]
    fn prefix_scan_respects_limit() {
        let store = seeded();
        let entries = store.scan_prefix("alice/", None, 2).unwrap();
        assert_eq!(keys(&entries), vec!["alice/1", "alice/2"]);
        assert!(store.scan_prefix("alice/", None, 0).unwrap().is_empty());
    }

    #[test]
    fn prefix_scan_resumes_after_cursor() {
        let store = seeded();
        let entries = store.scan_prefix("alice/", Some("alice/1"), 100).unwrap();
        assert_eq!(keys(&entries), vec!["alice/2", "alice/3"]);

        let tail = store.scan_prefix("alice/", Some("alice/3"), 100).unwrap();
        assert!(tail.is_empty());
    }

    #[test]
    fn cursor_before_prefix_starts_at_prefix() {
        let store = seeded();
        let entries = store.scan_prefix("bob/", Some("alice/9"), 100).unwrap();
        assert_eq!(keys(&entries), vec!["bob/1"]);
    }

    #[test]
    fn empty_prefix_scan() {
        let store = seeded();
        assert!(store.scan_prefix("carol/", None, 10).unwrap().is_empty());
    }

    #[test]
    fn len_and_is_empty() {
        let store = InMemoryKvStore::new();
        assert!(store.is_empty().unwrap());
        store.insert("x/1", b"").unwrap();
        assert_eq!(store.len().unwrap(), 1);
        assert!(!store.is_empty().unwrap());
    }

    #[test]
    fn put_raw_overwrites() {
        let store = InMemoryKvStore::new();
        store.insert("x/1", b"a").unwrap();
        store.put_raw("x/1", b"b").unwrap();
        assert_eq!(store.get("x/1").unwrap(), Some(b"b".to_vec()));
        assert_eq!(store.keys().unwrap(), vec!["x/1".to_string()]);
    }

    #[test]
    fn concurrent_inserts_are_not_lost() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryKvStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.insert(&format!("inbox/{i}"), b"x").unwrap())
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }
        assert_eq!(store.scan_prefix("inbox/", None, 100).unwrap().len(), 8);
    }

    #[test]
    fn debug_format() {
        let store = seeded();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryKvStore"));
        assert!(debug.contains("key_count"));
    }
}
