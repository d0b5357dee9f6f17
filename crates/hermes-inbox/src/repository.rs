use std::sync::Arc;

use hermes_store::{KeyValueStore, KvError};
use hermes_types::{InboxId, Notification, NotificationDraft, NotificationId};
use tracing::debug;

use crate::error::{InboxError, InboxResult};

/// Separator between the inbox and notification parts of a storage key.
pub const KEY_DELIMITER: char = '/';

/// Default maximum number of notifications returned by one `list` call.
pub const DEFAULT_PAGE_SIZE: usize = 128;

/// Storage key of one notification: `<inboxID>/<notificationID>`.
pub fn storage_key(inbox: &InboxId, id: &NotificationId) -> String {
    format!("{inbox}{KEY_DELIMITER}{id}")
}

/// Key prefix shared by every notification of `inbox`: `<inboxID>/`.
pub fn inbox_prefix(inbox: &InboxId) -> String {
    format!("{inbox}{KEY_DELIMITER}")
}

/// One page of an inbox listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotificationPage {
    /// Notifications in key (hence id) order.
    pub notifications: Vec<Notification>,
    /// Set when more notifications follow; pass it back as `after` to
    /// continue the listing.
    pub next: Option<NotificationId>,
}

impl NotificationPage {
    pub fn is_truncated(&self) -> bool {
        self.next.is_some()
    }
}

/// Notification persistence over an ordered key-value store.
///
/// Holds no state of its own beyond the injected store handle, so a single
/// repository can serve any number of concurrent requests.
#[derive(Clone)]
pub struct NotificationRepository {
    store: Arc<dyn KeyValueStore>,
    page_size: usize,
}

impl NotificationRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Cap `list` results at `page_size` (at least one).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Assign a fresh id to `draft` and store it in `inbox`.
    pub fn create(&self, inbox: &InboxId, draft: NotificationDraft) -> InboxResult<Notification> {
        let notification = Notification::from_draft(NotificationId::generate(), draft);
        let value = serde_json::to_vec(&notification)
            .map_err(|e| InboxError::StorageWrite(e.to_string()))?;
        let key = storage_key(inbox, &notification.id);

        self.store
            .insert(&key, &value)
            .map_err(|e| InboxError::StorageWrite(e.to_string()))?;
        debug!(inbox = %inbox, id = %notification.id, "notification stored");
        Ok(notification)
    }

    /// List the notifications of `inbox` in key order, one page at a time.
    ///
    /// With `after = None` the listing starts at the beginning of the inbox.
    /// An inbox nobody has posted to is simply empty.
    pub fn list(
        &self,
        inbox: &InboxId,
        after: Option<&NotificationId>,
    ) -> InboxResult<NotificationPage> {
        let prefix = inbox_prefix(inbox);
        let cursor = after.map(|id| storage_key(inbox, id));

        // One extra entry tells us whether another page exists.
        let mut entries = self
            .store
            .scan_prefix(&prefix, cursor.as_deref(), self.page_size.saturating_add(1))
            .map_err(read_error)?;
        let truncated = entries.len() > self.page_size;
        entries.truncate(self.page_size);

        let notifications = entries
            .iter()
            .map(|(key, value)| {
                serde_json::from_slice::<Notification>(value)
                    .map_err(|e| InboxError::StorageRead(format!("corrupt record {key}: {e}")))
            })
            .collect::<InboxResult<Vec<_>>>()?;

        let next = if truncated {
            notifications.last().map(|n| n.id.clone())
        } else {
            None
        };
        debug!(inbox = %inbox, count = notifications.len(), truncated, "inbox listed");
        Ok(NotificationPage {
            notifications,
            next,
        })
    }

    /// Exact lookup of one notification.
    pub fn get(&self, inbox: &InboxId, id: &NotificationId) -> InboxResult<Notification> {
        let key = storage_key(inbox, id);
        let value = self
            .store
            .get(&key)
            .map_err(read_error)?
            .ok_or_else(|| InboxError::NotFound {
                inbox: inbox.clone(),
                notification: id.clone(),
            })?;
        serde_json::from_slice(&value)
            .map_err(|e| InboxError::StorageRead(format!("corrupt record {key}: {e}")))
    }
}

fn read_error(e: KvError) -> InboxError {
    InboxError::StorageRead(e.to_string())
}

impl std::fmt::Debug for NotificationRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationRepository")
            .field("page_size", &self.page_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_store::{InMemoryKvStore, KvResult, RedbKvStore, ScanEntry};

    fn draft(actor: &str) -> NotificationDraft {
        NotificationDraft {
            actor: actor.into(),
            object: "doc1".into(),
            target: "alice".into(),
            updated: "2024-01-01T00:00:00Z".into(),
        }
    }

    fn inbox(s: &str) -> InboxId {
        InboxId::new(s).unwrap()
    }

    fn repo() -> (Arc<InMemoryKvStore>, NotificationRepository) {
        let store = Arc::new(InMemoryKvStore::new());
        let repo = NotificationRepository::new(store.clone());
        (store, repo)
    }

    /// A store whose every operation fails.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> KvResult<Option<Vec<u8>>> {
            Err(KvError::Storage("disk on fire".into()))
        }
        fn insert(&self, _key: &str, _value: &[u8]) -> KvResult<()> {
            Err(KvError::Commit("disk on fire".into()))
        }
        fn scan_prefix(&self, _p: &str, _a: Option<&str>, _l: usize) -> KvResult<Vec<ScanEntry>> {
            Err(KvError::Storage("disk on fire".into()))
        }
        fn len(&self) -> KvResult<u64> {
            Ok(0)
        }
    }

    #[test]
    fn key_scheme() {
        let id = NotificationId::parse("n1").unwrap();
        assert_eq!(storage_key(&inbox("alice"), &id), "alice/n1");
        assert_eq!(inbox_prefix(&inbox("alice")), "alice/");
    }

    #[test]
    fn create_assigns_id_and_persists() {
        let (store, repo) = repo();
        let n = repo.create(&inbox("alice"), draft("bob")).unwrap();
        assert_eq!(n.actor, "bob");

        let raw = store.get(&storage_key(&inbox("alice"), &n.id)).unwrap().unwrap();
        let stored: Notification = serde_json::from_slice(&raw).unwrap();
        assert_eq!(stored, n);
    }

    #[test]
    fn get_roundtrip() {
        let (_store, repo) = repo();
        let n = repo.create(&inbox("alice"), draft("bob")).unwrap();
        assert_eq!(repo.get(&inbox("alice"), &n.id).unwrap(), n);
    }

    #[test]
    fn get_missing_is_not_found() {
        let (_store, repo) = repo();
        let missing = NotificationId::generate();
        let err = repo.get(&inbox("alice"), &missing).unwrap_err();
        assert!(matches!(err, InboxError::NotFound { .. }));
    }

    #[test]
    fn get_in_wrong_inbox_is_not_found() {
        let (_store, repo) = repo();
        let n = repo.create(&inbox("alice"), draft("bob")).unwrap();
        assert!(matches!(
            repo.get(&inbox("carol"), &n.id).unwrap_err(),
            InboxError::NotFound { .. }
        ));
    }

    #[test]
    fn list_empty_inbox() {
        let (_store, repo) = repo();
        let page = repo.list(&inbox("nobody"), None).unwrap();
        assert!(page.notifications.is_empty());
        assert!(!page.is_truncated());
    }

    #[test]
    fn list_is_key_ordered_and_scoped() {
        let (_store, repo) = repo();
        let mut ids: Vec<_> = (0..5)
            .map(|i| repo.create(&inbox("alice"), draft(&format!("a{i}"))).unwrap().id)
            .collect();
        repo.create(&inbox("alicia"), draft("other")).unwrap();
        repo.create(&inbox("bob"), draft("other")).unwrap();
        ids.sort();

        let page = repo.list(&inbox("alice"), None).unwrap();
        let listed: Vec<_> = page.notifications.iter().map(|n| n.id.clone()).collect();
        assert_eq!(listed, ids);
        assert!(page.next.is_none());
    }

    #[test]
    fn list_pages_without_dropping_entries() {
        let (_store, repo) = repo();
        let repo = repo.with_page_size(2);
        let mut ids: Vec<_> = (0..5)
            .map(|_| repo.create(&inbox("alice"), draft("x")).unwrap().id)
            .collect();
        ids.sort();

        let mut seen = Vec::new();
        let mut after: Option<NotificationId> = None;
        loop {
            let page = repo.list(&inbox("alice"), after.as_ref()).unwrap();
            assert!(page.notifications.len() <= 2);
            seen.extend(page.notifications.iter().map(|n| n.id.clone()));
            match page.next {
                Some(next) => after = Some(next),
                None => break,
            }
        }
        assert_eq!(seen, ids);
    }

    #[test]
    fn exact_page_is_not_truncated() {
        let (_store, repo) = repo();
        let repo = repo.with_page_size(3);
        for _ in 0..3 {
            repo.create(&inbox("alice"), draft("x")).unwrap();
        }
        let page = repo.list(&inbox("alice"), None).unwrap();
        assert_eq!(page.notifications.len(), 3);
        assert!(!page.is_truncated());
    }

    #[test]
    fn huge_page_size_lists_everything() {
        let (_store, repo) = repo();
        let repo = repo.with_page_size(usize::MAX);
        let n = repo.create(&inbox("alice"), draft("bob")).unwrap();

        let page = repo.list(&inbox("alice"), None).unwrap();
        assert_eq!(page.notifications, vec![n]);
        assert!(!page.is_truncated());
    }

    #[test]
    fn page_size_is_at_least_one() {
        let (_store, repo) = repo();
        assert_eq!(repo.with_page_size(0).page_size(), 1);
    }

    #[test]
    fn corrupt_record_is_read_error() {
        let (store, repo) = repo();
        let id = NotificationId::parse("broken").unwrap();
        store.put_raw(&storage_key(&inbox("alice"), &id), b"not json").unwrap();

        assert!(matches!(
            repo.get(&inbox("alice"), &id).unwrap_err(),
            InboxError::StorageRead(_)
        ));
        assert!(matches!(
            repo.list(&inbox("alice"), None).unwrap_err(),
            InboxError::StorageRead(_)
        ));
    }

    #[test]
    fn store_failures_map_to_storage_errors() {
        let repo = NotificationRepository::new(Arc::new(BrokenStore));
        let id = NotificationId::generate();
        assert!(matches!(
            repo.create(&inbox("a"), draft("x")).unwrap_err(),
            InboxError::StorageWrite(_)
        ));
        assert!(matches!(repo.get(&inbox("a"), &id).unwrap_err(), InboxError::StorageRead(_)));
        assert!(matches!(repo.list(&inbox("a"), None).unwrap_err(), InboxError::StorageRead(_)));
    }

    #[test]
    fn concurrent_creates_get_distinct_ids() {
        use std::thread;

        let (_store, repo) = repo();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                thread::spawn(move || repo.create(&inbox("alice"), draft("x")).unwrap().id)
            })
            .collect();
        let mut ids: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert_eq!(repo.list(&inbox("alice"), None).unwrap().notifications.len(), 8);
    }

    #[test]
    fn works_over_redb() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(RedbKvStore::open(dir.path().join("inbox.redb")).unwrap());
        let repo = NotificationRepository::new(store);
        let n = repo.create(&inbox("alice"), draft("bob")).unwrap();
        assert_eq!(repo.get(&inbox("alice"), &n.id).unwrap(), n);
        assert_eq!(repo.list(&inbox("alice"), None).unwrap().notifications, vec![n]);
    }
}
