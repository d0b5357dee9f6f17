use std::path::PathBuf;

/// Errors from key-value store operations.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    /// The database file could not be opened or created.
    #[error("cannot open store at {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    /// A read or write transaction could not be started.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// The table could not be opened.
    #[error("table error: {0}")]
    Table(String),

    /// Failure reading or writing the underlying storage.
    #[error("storage error: {0}")]
    Storage(String),

    /// A write transaction failed to commit.
    #[error("commit error: {0}")]
    Commit(String),

    /// A create-only write hit an existing key.
    #[error("key already exists: {0}")]
    AlreadyExists(String),

    /// An in-memory lock was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// I/O error while preparing the storage location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<redb::TransactionError> for KvError {
    fn from(e: redb::TransactionError) -> Self {
        Self::Transaction(e.to_string())
    }
}

impl From<redb::TableError> for KvError {
    fn from(e: redb::TableError) -> Self {
        Self::Table(e.to_string())
    }
}

impl From<redb::StorageError> for KvError {
    fn from(e: redb::StorageError) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<redb::CommitError> for KvError {
    fn from(e: redb::CommitError) -> Self {
        Self::Commit(e.to_string())
    }
}

/// Result alias for store operations.
pub type KvResult<T> = Result<T, KvError>;
