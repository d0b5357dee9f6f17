use hermes_protocol::{LdNotification, LdnInbox};
use hermes_types::{InboxId, NotificationDraft, NotificationId};
use tracing::{debug, info, warn};

use crate::error::{ErrorKind, InboxResult};
use crate::presenter::{present_inbox, present_notification};
use crate::repository::NotificationRepository;
use crate::resolver::{IdentityResolver, TransportContext};

/// The three externally visible inbox operations.
///
/// Each method validates the raw identifiers it receives, calls the
/// repository, and renders IRIs for the current transport context. The
/// service holds no state of its own.
#[derive(Clone, Debug)]
pub struct InboxService {
    repository: NotificationRepository,
    resolver: IdentityResolver,
}

impl InboxService {
    pub fn new(repository: NotificationRepository, resolver: IdentityResolver) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    pub fn repository(&self) -> &NotificationRepository {
        &self.repository
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    /// Store a notification posted to `inbox_id` and return its IRI, for use
    /// as the `Location` of the creation response.
    pub fn create_notification(
        &self,
        inbox_id: &str,
        payload: &[u8],
        ctx: &TransportContext,
    ) -> InboxResult<String> {
        log_failure(
            "create_notification",
            inbox_id,
            self.try_create(inbox_id, payload, ctx),
        )
    }

    /// The inbox container document, one page at a time.
    ///
    /// `after` is the `next` cursor of a previous page; `None` starts from
    /// the first notification.
    pub fn get_inbox(
        &self,
        inbox_id: &str,
        after: Option<&str>,
        ctx: &TransportContext,
    ) -> InboxResult<LdnInbox> {
        log_failure("get_inbox", inbox_id, self.try_get_inbox(inbox_id, after, ctx))
    }

    /// The document of a single notification.
    pub fn get_notification(
        &self,
        inbox_id: &str,
        notification_id: &str,
        ctx: &TransportContext,
    ) -> InboxResult<LdNotification> {
        log_failure(
            "get_notification",
            inbox_id,
            self.try_get_notification(inbox_id, notification_id, ctx),
        )
    }

    fn try_create(
        &self,
        inbox_id: &str,
        payload: &[u8],
        ctx: &TransportContext,
    ) -> InboxResult<String> {
        let inbox = InboxId::new(inbox_id)?;
        let draft = NotificationDraft::from_json(payload)?;
        let notification = self.repository.create(&inbox, draft)?;
        let location = self
            .resolver
            .resolve_notification_id(&inbox, &notification.id, ctx)?;
        info!(inbox = %inbox, id = %notification.id, "notification accepted");
        Ok(location)
    }

    fn try_get_inbox(
        &self,
        inbox_id: &str,
        after: Option<&str>,
        ctx: &TransportContext,
    ) -> InboxResult<LdnInbox> {
        let inbox = InboxId::new(inbox_id)?;
        let after = match after {
            Some(cursor) => Some(NotificationId::parse(cursor)?),
            None => None,
        };
        let page = self.repository.list(&inbox, after.as_ref())?;
        let inbox_uri = self.resolver.resolve_inbox_id(&inbox, ctx)?;

        let doc = present_inbox(inbox_uri.as_str(), &page.notifications, |id| {
            self.resolver.resolve_notification_id(&inbox, id, ctx)
        })?;
        debug!(inbox = %inbox, members = doc.contains.len(), "inbox presented");
        Ok(match page.next {
            Some(next) => doc.with_next(next_link(&inbox_uri, &next)),
            None => doc,
        })
    }

    fn try_get_notification(
        &self,
        inbox_id: &str,
        notification_id: &str,
        ctx: &TransportContext,
    ) -> InboxResult<LdNotification> {
        let inbox = InboxId::new(inbox_id)?;
        let id = NotificationId::parse(notification_id)?;
        let notification = self.repository.get(&inbox, &id)?;
        debug!(inbox = %inbox, id = %id, "notification presented");
        present_notification(notification, |id| {
            self.resolver.resolve_notification_id(&inbox, id, ctx)
        })
    }
}

/// Follow-up link for a truncated inbox page. Inbox IRIs may already carry a
/// query string when the template puts the inbox id there.
fn next_link(inbox_uri: &str, next: &NotificationId) -> String {
    let separator = if inbox_uri.contains('?') { '&' } else { '?' };
    format!("{inbox_uri}{separator}after={next}")
}

fn log_failure<T>(operation: &str, inbox_id: &str, result: InboxResult<T>) -> InboxResult<T> {
    if let Err(e) = &result {
        match e.kind() {
            ErrorKind::Internal => {
                tracing::error!(operation, inbox = inbox_id, error = %e, "inbox operation failed")
            }
            ErrorKind::BadRequest | ErrorKind::NotFound => {
                warn!(operation, inbox = inbox_id, error = %e, "inbox operation rejected")
            }
        }
    }
    result
}
