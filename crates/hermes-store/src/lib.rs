//! Ordered key-value storage for the Hermes inbox.
//!
//! The inbox core never talks to a database directly. It holds an injected
//! handle to a [`KeyValueStore`]: an ordered map from UTF-8 keys to opaque
//! byte values with point reads, create-only single-key writes and bounded
//! prefix scans.
//!
//! # Storage Backends
//!
//! - [`InMemoryKvStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`RedbKvStore`] -- durable single-file store backed by redb
//!
//! # Design Rules
//!
//! 1. Every write is one atomic, durable transaction touching one key.
//! 2. Values are immutable once written; there is no update or delete.
//! 3. A scan reads from a single snapshot taken when the scan starts.
//! 4. The store never interprets values.
//! 5. All backend errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod redb_store;
pub mod traits;

pub use error::{KvError, KvResult};
pub use memory::InMemoryKvStore;
pub use redb_store::RedbKvStore;
pub use traits::{KeyValueStore, ScanEntry};
