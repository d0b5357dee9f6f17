use std::ops::Bound;
use std::path::{Path, PathBuf};

use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use tracing::{debug, info};

use crate::error::{KvError, KvResult};
use crate::traits::{resume_after, KeyValueStore, ScanEntry};

/// Notification records keyed by `{inbox_id}/{notification_id}`.
const NOTIFICATIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("notifications");

/// Durable key-value store backed by a single redb database file.
///
/// Opened once at startup and shared by reference; the file is closed when
/// the last handle is dropped. redb serializes write transactions and gives
/// every read transaction an MVCC snapshot, which is exactly the isolation
/// the inbox needs.
pub struct RedbKvStore {
    db: Database,
    path: PathBuf,
}

impl RedbKvStore {
    /// Open the database at `path`, creating the file, its parent directory
    /// and the notifications table as needed.
    pub fn open(path: impl AsRef<Path>) -> KvResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::create(&path).map_err(|e| KvError::Open {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        // Create the table up front so readers never see it missing.
        let txn = db.begin_write()?;
        txn.open_table(NOTIFICATIONS)?;
        txn.commit()?;

        info!(path = %path.display(), "notification store opened");
        Ok(Self { db, path })
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for RedbKvStore {
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(NOTIFICATIONS)?;
        let value = table.get(key)?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn insert(&self, key: &str, value: &[u8]) -> KvResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(NOTIFICATIONS)?;
            let taken = table.get(key)?.is_some();
            if taken {
                // Dropping the uncommitted transaction aborts it.
                return Err(KvError::AlreadyExists(key.to_string()));
            }
            table.insert(key, value)?;
        }
        txn.commit()?;
        debug!(key, len = value.len(), "record committed");
        Ok(())
    }

    fn scan_prefix(
        &self,
        prefix: &str,
        after: Option<&str>,
        limit: usize,
    ) -> KvResult<Vec<ScanEntry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let txn = self.db.begin_read()?;
        let table = txn.open_table(NOTIFICATIONS)?;
        let range = match resume_after(prefix, after) {
            Some(after) => table.range::<&str>((Bound::Excluded(after), Bound::Unbounded))?,
            None => table.range::<&str>((Bound::Included(prefix), Bound::Unbounded))?,
        };

        let mut entries = Vec::new();
        for item in range {
            let (key, value) = item?;
            let key = key.value();
            if !key.starts_with(prefix) {
                break;
            }
            entries.push((key.to_string(), value.value().to_vec()));
            if entries.len() >= limit {
                break;
            }
        }
        debug!(prefix, count = entries.len(), "prefix scan");
        Ok(entries)
    }

    fn len(&self) -> KvResult<u64> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(NOTIFICATIONS)?;
        Ok(table.len()?)
    }
}

impl std::fmt::Debug for RedbKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbKvStore")
            .field("path", &self.path)
            .finish()
    }
}
