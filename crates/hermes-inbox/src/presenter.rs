//! Maps stored notifications to their JSON-LD wire documents.
//!
//! The presenter never sees templates or transport details: callers pass an
//! `id_mapper` closure that turns a notification id into its absolute IRI.

use hermes_protocol::{LdNotification, LdnInbox, ACTIVITY_STREAMS_CONTEXT, ANNOUNCE_TYPE};
use hermes_types::{Notification, NotificationId};

use crate::error::InboxResult;

/// Build the inbox container document, listing members in the given order.
pub fn present_inbox<F>(
    inbox_uri: impl Into<String>,
    notifications: &[Notification],
    mut id_mapper: F,
) -> InboxResult<LdnInbox>
where
    F: FnMut(&NotificationId) -> InboxResult<String>,
{
    let contains = notifications
        .iter()
        .map(|n| id_mapper(&n.id))
        .collect::<InboxResult<Vec<_>>>()?;
    Ok(LdnInbox::new(inbox_uri, contains))
}

/// Build the Activity Streams document of one notification.
pub fn present_notification<F>(notification: Notification, id_mapper: F) -> InboxResult<LdNotification>
where
    F: FnOnce(&NotificationId) -> InboxResult<String>,
{
    Ok(LdNotification {
        context: ACTIVITY_STREAMS_CONTEXT.into(),
        id: id_mapper(&notification.id)?,
        kind: ANNOUNCE_TYPE.into(),
        actor: notification.actor,
        object: notification.object,
        target: notification.target,
        updated: notification.updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InboxError;
    use hermes_protocol::LDP_CONTEXT;

    fn notification(id: &str) -> Notification {
        Notification {
            id: NotificationId::parse(id).unwrap(),
            actor: "bob".into(),
            object: "doc1".into(),
            target: "alice".into(),
            updated: "2024-01-01T00:00:00Z".into(),
        }
    }

    fn mapper(id: &NotificationId) -> InboxResult<String> {
        Ok(format!("http://example.org/m/alice/{id}"))
    }

    #[test]
    fn inbox_lists_members_in_order() {
        let ns = vec![notification("b"), notification("a"), notification("c")];
        let doc = present_inbox("http://example.org/m/alice", &ns, mapper).unwrap();
        assert_eq!(doc.context, LDP_CONTEXT);
        assert_eq!(doc.id, "http://example.org/m/alice");
        assert_eq!(
            doc.contains,
            vec![
                "http://example.org/m/alice/b",
                "http://example.org/m/alice/a",
                "http://example.org/m/alice/c",
            ]
        );
        assert!(doc.next.is_none());
    }

    #[test]
    fn empty_inbox() {
        let doc = present_inbox("i", &[], mapper).unwrap();
        assert!(doc.contains.is_empty());
    }

    #[test]
    fn notification_fields_are_copied_verbatim() {
        let doc = present_notification(notification("n1"), mapper).unwrap();
        assert_eq!(doc.context, ACTIVITY_STREAMS_CONTEXT);
        assert_eq!(doc.id, "http://example.org/m/alice/n1");
        assert_eq!(doc.kind, "Announce");
        assert_eq!(doc.actor, "bob");
        assert_eq!(doc.object, "doc1");
        assert_eq!(doc.target, "alice");
        assert_eq!(doc.updated, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn mapper_failure_propagates() {
        let failing = |_: &NotificationId| -> InboxResult<String> {
            Err(InboxError::TemplateRender("boom".into()))
        };
        assert!(present_inbox("i", &[notification("a")], failing).is_err());
        assert!(present_notification(notification("a"), failing).is_err());
    }
}
